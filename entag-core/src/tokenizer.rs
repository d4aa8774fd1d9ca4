//! # Tokenizador com Preservação de Offsets
//!
//! Divide o texto bruto em sentenças e tokens. Cada token guarda sua posição
//! exata no texto original (`start` e `end`, em bytes), o que é crucial aqui:
//! a renderização reproduz o texto de entrada byte a byte, e os trechos entre
//! tokens (espaços, pontuação solta, quebras de linha) são emitidos verbatim
//! a partir desses offsets.
//!
//! ## Modos de Tokenização
//!
//! - **Standard**: segmentação por fronteiras de palavra Unicode (UAX-29),
//!   com junção de abreviações comuns ("Dr" + "." -> "Dr.") e quebra de
//!   sentença em pontuação final.
//! - **Vertical**: um token por linha; linha em branco encerra a sentença.
//!   Formato usado quando a entrada já vem tokenizada por outra ferramenta.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// Unidade atômica do pipeline. `start`/`end` delimitam o intervalo de bytes
/// semiaberto `[start, end)` no texto do bloco; `index` é o índice sequencial
/// do token dentro da sua sentença (0, 1, 2...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Lula", ",", "presidente").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusivo).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice do token na sentença.
    pub index: usize,
}

/// Estratégias de tokenização disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// Texto corrido: segmentação por fronteiras de palavra + sentenças.
    Standard,
    /// Um token por linha, sentenças separadas por linha em branco.
    Vertical,
}

impl Default for TokenizerMode {
    fn default() -> Self {
        TokenizerMode::Standard
    }
}

/// Abreviações que não encerram sentença: o ponto que as segue é juntado ao
/// token ("Dr" + "." -> "Dr.") em vez de virar pontuação final.
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Dra", "Sr", "Sra", "Prof", "Profa", "Eng", "Gen", "Min", "Pres",
    "Av", "etc", "art", "pág", "tel", "vol",
];

/// Pontuações que encerram uma sentença no modo Standard.
const SENTENCE_ENDS: &[&str] = &[".", "!", "?", "…"];

/// Tokeniza um texto, agrupando os tokens por sentença.
///
/// Os offsets dos tokens indexam o texto recebido; índices de token são
/// locais a cada sentença. Texto sem nenhum token produz zero sentenças.
pub fn tokenize_sentences(text: &str, mode: TokenizerMode) -> Vec<Vec<Token>> {
    match mode {
        TokenizerMode::Standard => split_sentences(tokenize_standard(text)),
        TokenizerMode::Vertical => tokenize_vertical(text),
    }
}

/// Tokeniza um texto como um único fluxo, sem agrupamento por sentença.
/// Usado também para normalizar frases de gazetteer com a mesma segmentação
/// que o texto de entrada recebe.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = tokenize_standard(text);
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// Segmenta o texto em tokens pelo algoritmo de fronteiras de palavra
/// Unicode, descartando segmentos de espaço e juntando abreviação + ponto.
fn tokenize_standard(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for (start, word) in text.split_word_bound_indices() {
        if word.chars().all(char::is_whitespace) {
            continue;
        }

        // Junta "Dr" + "." em um único token "Dr."
        if word == "." {
            if let Some(last) = tokens.last_mut() {
                if last.end == start && ABBREVIATIONS.contains(&last.text.as_str()) {
                    last.text.push('.');
                    last.end = start + 1;
                    continue;
                }
            }
        }

        tokens.push(Token {
            text: word.to_string(),
            start,
            end: start + word.len(),
            index: 0,
        });
    }

    tokens
}

/// Agrupa uma sequência de tokens em sentenças, quebrando após pontuação
/// final, e atribui os índices locais.
fn split_sentences(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut sentences = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for mut token in tokens {
        let ends_sentence = SENTENCE_ENDS.contains(&token.text.as_str());
        token.index = current.len();
        current.push(token);
        if ends_sentence {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Tokenizador vertical: cada linha não vazia é um token; linha em branco
/// encerra a sentença. Os offsets continuam apontando para o texto bruto,
/// então as quebras de linha são preservadas como texto entre tokens.
fn tokenize_vertical(text: &str) -> Vec<Vec<Token>> {
    let mut sentences = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        if content.is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
        } else {
            current.push(Token {
                text: content.to_string(),
                start: offset,
                end: offset + content.len(),
                index: current.len(),
            });
        }
        offset += line.len();
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}
