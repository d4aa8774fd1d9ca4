//! # Reconhecedor por Gazetteers e Regras
//!
//! A fonte de entidades do pipeline: recebe os tokens de uma sentença e
//! devolve spans de entidade, sem garantia de ordem. O reconhecimento é
//! feito diretamente sobre spans (não token a token): todas as ocorrências
//! de frases dos gazetteers são emitidas, inclusive as aninhadas — "São
//! Paulo" (LOC) dentro de "Universidade de São Paulo" (ORG) gera dois spans.
//!
//! Regras complementam os gazetteers com conhecimento explícito: títulos que
//! precedem nomes de pessoa, sufixos societários e padrões regex de alta
//! precisão (CNPJ, datas).
//!
//! Candidatos que se cruzariam (sobreposição parcial sem contenção) são
//! resolvidos aqui, mantendo o span que começa antes ou, no mesmo início, o
//! mais longo — o consumidor só recebe conjuntos aninháveis.

use regex::Regex;

use crate::entity::{EntityCategory, EntitySpan};
use crate::model::NerModel;
use crate::tokenizer::{tokenize, Token};

/// Janela máxima de tokens adjacentes concatenados para os padrões regex
/// ("12.345.678/0001-90" vira cinco tokens no modo standard).
const MAX_PATTERN_WINDOW: usize = 6;

/// Uma frase de gazetteer pré-segmentada.
struct Phrase {
    /// Partes em minúsculas, na segmentação do tokenizador standard.
    parts: Vec<String>,
    /// A frase inteira em minúsculas, para entrada já tokenizada em que a
    /// frase ocupa um único token (modo vertical).
    joined: String,
    category: EntityCategory,
    confidence: f64,
    rule: &'static str,
}

/// Motor de reconhecimento com gazetteers e padrões.
pub struct Recognizer {
    phrases: Vec<Phrase>,
    person_titles: Vec<&'static str>,
    org_indicators: Vec<&'static str>,
    cnpj: Regex,
    date: Regex,
}

impl Recognizer {
    /// Constrói o reconhecedor a partir dos gazetteers do modelo.
    pub fn new(model: &NerModel) -> Recognizer {
        let mut phrases = Vec::new();
        let sources: [(&[String], EntityCategory, f64, &'static str); 4] = [
            (model.gazetteers.persons.as_slice(), EntityCategory::Per, 0.92, "person_gazetteer"),
            (model.gazetteers.locations.as_slice(), EntityCategory::Loc, 0.90, "location_gazetteer"),
            (model.gazetteers.organizations.as_slice(), EntityCategory::Org, 0.93, "org_gazetteer"),
            (model.gazetteers.misc.as_slice(), EntityCategory::Misc, 0.88, "misc_gazetteer"),
        ];
        for (entries, category, confidence, rule) in sources {
            for entry in entries {
                let parts: Vec<String> = tokenize(entry)
                    .into_iter()
                    .map(|t| t.text.to_lowercase())
                    .collect();
                if parts.is_empty() {
                    continue;
                }
                phrases.push(Phrase {
                    joined: entry.to_lowercase(),
                    parts,
                    category,
                    confidence,
                    rule,
                });
            }
        }

        Recognizer {
            phrases,
            person_titles: vec![
                "presidente", "ex-presidente", "senador", "senadora", "deputado",
                "deputada", "ministro", "ministra", "governador", "governadora",
                "prefeito", "prefeita", "escritor", "escritora", "jogador",
                "jogadora", "dr.", "dra.", "prof.", "profa.",
            ],
            org_indicators: vec!["s.a", "s.a.", "s/a", "sa", "ltda", "ltda.", "inc", "corp"],
            cnpj: Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$")
                .expect("padrão CNPJ inválido"),
            date: Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").expect("padrão de data inválido"),
        }
    }

    /// Reconhece entidades em uma sentença tokenizada.
    ///
    /// A ordem do resultado não é garantida; o chamador ordena para a
    /// emissão aninhada. Spans duplicados (mesmo intervalo) colapsam para o
    /// candidato de maior confiança, e candidatos cruzados são filtrados.
    pub fn recognize(&self, tokens: &[Token]) -> Vec<EntitySpan> {
        let lower: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
        let mut found = Vec::new();

        // 1. Gazetteers: todas as ocorrências de cada frase (n-gramas)
        for phrase in &self.phrases {
            let n = phrase.parts.len();
            if n > 0 && n <= tokens.len() {
                for i in 0..=tokens.len() - n {
                    if lower[i..i + n] == phrase.parts[..] {
                        found.push(EntitySpan {
                            start_token: i,
                            length_tokens: n,
                            category: phrase.category,
                            confidence: phrase.confidence,
                            source: phrase.rule.to_string(),
                        });
                    }
                }
            }
            // frase inteira em um único token (entrada vertical)
            if n > 1 {
                for (i, token_lower) in lower.iter().enumerate() {
                    if *token_lower == phrase.joined {
                        found.push(EntitySpan {
                            start_token: i,
                            length_tokens: 1,
                            category: phrase.category,
                            confidence: phrase.confidence,
                            source: phrase.rule.to_string(),
                        });
                    }
                }
            }
        }

        // 2. Título + nome próprio: "presidente Lula" -> "Lula" é PER
        for i in 0..tokens.len().saturating_sub(1) {
            if self.person_titles.contains(&lower[i].as_str())
                && starts_uppercase(&tokens[i + 1].text)
            {
                found.push(EntitySpan {
                    start_token: i + 1,
                    length_tokens: 1,
                    category: EntityCategory::Per,
                    confidence: 0.80,
                    source: "title_pattern".to_string(),
                });
            }
        }

        // 3. Sufixo societário: "Vale S.A" -> "Vale S.A" é ORG
        for i in 1..tokens.len() {
            if self.org_indicators.contains(&lower[i].as_str())
                && starts_uppercase(&tokens[i - 1].text)
            {
                found.push(EntitySpan {
                    start_token: i - 1,
                    length_tokens: 2,
                    category: EntityCategory::Org,
                    confidence: 0.85,
                    source: "org_suffix_pattern".to_string(),
                });
            }
        }

        // 4. Padrões regex sobre janelas de tokens adjacentes (sem lacuna)
        self.match_patterns(tokens, &mut found);

        resolve_conflicts(found)
    }

    /// Testa os padrões regex concatenando tokens adjacentes, já que o
    /// tokenizador standard separa "/" e "-" em tokens próprios.
    fn match_patterns(&self, tokens: &[Token], found: &mut Vec<EntitySpan>) {
        for i in 0..tokens.len() {
            let mut window = String::new();
            for j in i..tokens.len().min(i + MAX_PATTERN_WINDOW) {
                if j > i && tokens[j].start != tokens[j - 1].end {
                    break;
                }
                window.push_str(&tokens[j].text);
                let length = j - i + 1;
                if self.cnpj.is_match(&window) {
                    found.push(EntitySpan {
                        start_token: i,
                        length_tokens: length,
                        category: EntityCategory::Org,
                        confidence: 0.99,
                        source: "cnpj_pattern".to_string(),
                    });
                } else if self.date.is_match(&window) {
                    found.push(EntitySpan {
                        start_token: i,
                        length_tokens: length,
                        category: EntityCategory::Misc,
                        confidence: 0.95,
                        source: "date_pattern".to_string(),
                    });
                }
            }
        }
    }
}

fn starts_uppercase(text: &str) -> bool {
    text.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// Colapsa duplicatas e remove candidatos cruzados: processando em ordem de
/// início crescente e comprimento decrescente, um candidato só sobrevive se
/// for disjunto de — ou propriamente aninhado em — todos os já mantidos.
fn resolve_conflicts(mut found: Vec<EntitySpan>) -> Vec<EntitySpan> {
    found.sort_by(|a, b| {
        a.start_token
            .cmp(&b.start_token)
            .then(b.length_tokens.cmp(&a.length_tokens))
            .then(
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut kept: Vec<EntitySpan> = Vec::new();
    for candidate in found {
        let duplicate = kept.iter().any(|k| {
            k.start_token == candidate.start_token
                && k.length_tokens == candidate.length_tokens
        });
        if duplicate || kept.iter().any(|k| k.crosses(&candidate)) {
            continue;
        }
        kept.push(candidate);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{tokenize_sentences, TokenizerMode};

    fn recognizer() -> Recognizer {
        Recognizer::new(&NerModel::builtin())
    }

    fn sentence(text: &str) -> Vec<Token> {
        let mut sentences = tokenize_sentences(text, TokenizerMode::Standard);
        assert_eq!(sentences.len(), 1);
        sentences.remove(0)
    }

    fn find<'a>(entities: &'a [EntitySpan], source: &str) -> Vec<&'a EntitySpan> {
        entities.iter().filter(|e| e.source == source).collect()
    }

    #[test]
    fn test_single_token_gazetteer() {
        let entities = recognizer().recognize(&sentence("Lula mora em São Paulo."));
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].start_token, 0);
        assert_eq!(entities[0].length_tokens, 1);
        assert_eq!(entities[0].category, EntityCategory::Per);
        assert_eq!(entities[1].start_token, 3);
        assert_eq!(entities[1].length_tokens, 2);
        assert_eq!(entities[1].category, EntityCategory::Loc);
    }

    #[test]
    fn test_nested_phrase_matches() {
        let entities = recognizer().recognize(&sentence("A Universidade de São Paulo cresceu."));
        let orgs = find(&entities, "org_gazetteer");
        let locs = find(&entities, "location_gazetteer");
        assert_eq!(orgs.len(), 1);
        assert_eq!((orgs[0].start_token, orgs[0].length_tokens), (1, 4));
        assert_eq!(locs.len(), 1);
        // "São Paulo" aninhado dentro da ORG
        assert_eq!((locs[0].start_token, locs[0].length_tokens), (3, 2));
    }

    #[test]
    fn test_same_start_nested_matches() {
        let entities = recognizer().recognize(&sentence("O São Paulo Futebol Clube venceu."));
        let orgs = find(&entities, "org_gazetteer");
        let locs = find(&entities, "location_gazetteer");
        assert_eq!((orgs[0].start_token, orgs[0].length_tokens), (1, 4));
        assert_eq!((locs[0].start_token, locs[0].length_tokens), (1, 2));
    }

    #[test]
    fn test_title_pattern() {
        let entities = recognizer().recognize(&sentence("A presidenta falou com o deputado Arthur."));
        let titled = find(&entities, "title_pattern");
        assert_eq!(titled.len(), 1);
        assert_eq!(titled[0].start_token, 6);
        assert_eq!(titled[0].category, EntityCategory::Per);
    }

    #[test]
    fn test_gazetteer_beats_title_duplicate() {
        // "Lula" é coberto pelo gazetteer (0.92) e pelo título (0.80);
        // o duplicado colapsa para o de maior confiança
        let entities = recognizer().recognize(&sentence("O presidente Lula viajou."));
        let lula: Vec<_> = entities.iter().filter(|e| e.start_token == 2).collect();
        assert_eq!(lula.len(), 1);
        assert_eq!(lula[0].source, "person_gazetteer");
    }

    #[test]
    fn test_org_suffix_pattern() {
        let entities = recognizer().recognize(&sentence("A Vale S.A anunciou lucros."));
        let orgs = find(&entities, "org_suffix_pattern");
        assert_eq!(orgs.len(), 1);
        assert_eq!((orgs[0].start_token, orgs[0].length_tokens), (1, 2));
    }

    #[test]
    fn test_cnpj_pattern() {
        let entities = recognizer().recognize(&sentence("Registrada sob 12.345.678/0001-90 ontem."));
        let cnpjs = find(&entities, "cnpj_pattern");
        assert_eq!(cnpjs.len(), 1);
        assert_eq!(cnpjs[0].category, EntityCategory::Org);
        assert_eq!(cnpjs[0].length_tokens, 5);
    }

    #[test]
    fn test_date_pattern() {
        let entities = recognizer().recognize(&sentence("Ele chegou em 12/03/2024 cedo."));
        let dates = find(&entities, "date_pattern");
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].category, EntityCategory::Misc);
        assert_eq!((dates[0].start_token, dates[0].length_tokens), (3, 5));
    }

    #[test]
    fn test_no_entities() {
        assert!(recognizer().recognize(&sentence("Nada para ver aqui.")).is_empty());
        assert!(recognizer().recognize(&[]).is_empty());
    }

    #[test]
    fn test_vertical_single_token_phrase() {
        let mut sentences = tokenize_sentences("São Paulo\nfica\nno\nBrasil\n", TokenizerMode::Vertical);
        let tokens = sentences.remove(0);
        let entities = recognizer().recognize(&tokens);
        let locs = find(&entities, "location_gazetteer");
        assert_eq!(locs.len(), 2);
        assert_eq!((locs[0].start_token, locs[0].length_tokens), (0, 1));
        assert_eq!((locs[1].start_token, locs[1].length_tokens), (3, 1));
    }

    #[test]
    fn test_crossing_candidates_filtered() {
        let spans = vec![
            EntitySpan {
                start_token: 0,
                length_tokens: 3,
                category: EntityCategory::Org,
                confidence: 0.9,
                source: "a".to_string(),
            },
            EntitySpan {
                start_token: 2,
                length_tokens: 3,
                category: EntityCategory::Loc,
                confidence: 0.9,
                source: "b".to_string(),
            },
            EntitySpan {
                start_token: 1,
                length_tokens: 2,
                category: EntityCategory::Per,
                confidence: 0.9,
                source: "c".to_string(),
            },
        ];
        let kept = resolve_conflicts(spans);
        // o span em 2..5 cruza 0..3 e cai; 1..3 é aninhado e sobrevive
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|k| k.source != "b"));
        for a in &kept {
            for b in &kept {
                assert!(!a.crosses(b));
            }
        }
    }
}
