//! # Pipeline NER — Orquestrador
//!
//! Conecta os estágios do sistema em um fluxo linear e sem estado mutável:
//! tokenização por sentença, reconhecimento de entidades, ordenação dos
//! spans e renderização com marcação aninhada. O processamento é totalmente
//! sequencial: um bloco é lido, analisado e renderizado por inteiro antes do
//! próximo ser lido; o único ponto de espera é a leitura da entrada.

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::blocks::read_block;
use crate::entity::EntitySpan;
use crate::error::{ModelError, RenderError};
use crate::model::NerModel;
use crate::recognizer::Recognizer;
use crate::render::{render_sentence, sort_entities, CrossingPolicy, MarkupSink};
use crate::tokenizer::{tokenize_sentences, Token, TokenizerMode};
use crate::xml::XmlSink;

/// Resultado da análise de uma sentença: seus tokens e as entidades já
/// ordenadas para emissão aninhada.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceAnalysis {
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
}

/// O pipeline NER principal.
///
/// Não guarda estado entre blocos: tokens, entidades e o estado de
/// renderização (cursor, pilha de fechamentos) são recriados a cada sentença
/// e descartados ao final dela.
pub struct NerPipeline {
    model: NerModel,
    recognizer: Recognizer,
    tokenizer_mode: TokenizerMode,
    crossing_policy: CrossingPolicy,
}

impl NerPipeline {
    /// Monta o pipeline para um modelo. Falha se o modelo nomear um
    /// tokenizador desconhecido (erro de configuração, fatal).
    pub fn new(model: NerModel) -> Result<NerPipeline, ModelError> {
        let tokenizer_mode = model.tokenizer_mode()?;
        let recognizer = Recognizer::new(&model);
        Ok(NerPipeline {
            model,
            recognizer,
            tokenizer_mode,
            crossing_policy: CrossingPolicy::default(),
        })
    }

    pub fn model(&self) -> &NerModel {
        &self.model
    }

    /// Sobrepõe o tokenizador do modelo (ex: entrada já tokenizada).
    pub fn set_tokenizer_mode(&mut self, mode: TokenizerMode) {
        self.tokenizer_mode = mode;
    }

    /// Define a política para spans estruturalmente inválidos.
    pub fn set_crossing_policy(&mut self, policy: CrossingPolicy) {
        self.crossing_policy = policy;
    }

    /// Tokeniza e reconhece um bloco de texto, sentença a sentença, com as
    /// entidades já em ordem de emissão.
    pub fn analyze_block(&self, text: &str) -> Vec<SentenceAnalysis> {
        tokenize_sentences(text, self.tokenizer_mode)
            .into_iter()
            .map(|tokens| {
                let mut entities = self.recognizer.recognize(&tokens);
                sort_entities(&mut entities);
                SentenceAnalysis { tokens, entities }
            })
            .collect()
    }

    /// Renderiza um bloco no sink: sentenças com marcação aninhada e, ao
    /// final, o texto restante do bloco (espaços e quebras após o último
    /// token), de modo que o texto de entrada seja reproduzido na íntegra.
    pub fn render_block<S: MarkupSink>(&self, text: &str, sink: &mut S) -> Result<(), RenderError> {
        let mut cursor = 0;
        for sentence in self.analyze_block(text) {
            cursor = render_sentence(
                text,
                cursor,
                &sentence.tokens,
                &sentence.entities,
                self.crossing_policy,
                sink,
            )?;
        }
        if cursor < text.len() {
            sink.text(&text[cursor..])?;
        }
        Ok(())
    }

    /// Conveniência: renderiza um bloco como uma string XML.
    pub fn markup(&self, text: &str) -> Result<String, RenderError> {
        let mut sink = XmlSink::new(Vec::new());
        self.render_block(text, &mut sink)?;
        Ok(String::from_utf8(sink.into_inner()).expect("a saída XML é sempre UTF-8 válido"))
    }

    /// Processa a entrada inteira, bloco de parágrafo a bloco de parágrafo,
    /// escrevendo a marcação XML no writer.
    pub fn run<R: BufRead, W: Write>(&self, mut reader: R, writer: W) -> Result<(), RenderError> {
        let mut sink = XmlSink::new(writer);
        let mut block = String::new();
        while read_block(&mut reader, &mut block)? {
            self.render_block(&block, &mut sink)?;
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Event, RecordingSink};

    fn pipeline() -> NerPipeline {
        NerPipeline::new(NerModel::builtin()).unwrap()
    }

    #[test]
    fn test_markup_basic() {
        let xml = pipeline().markup("Lula mora em São Paulo.").unwrap();
        assert_eq!(
            xml,
            "<sentence><ne type=\"PER\"><token>Lula</token></ne> <token>mora</token> \
             <token>em</token> <ne type=\"LOC\"><token>São</token> <token>Paulo</token></ne>\
             <token>.</token></sentence>"
        );
    }

    #[test]
    fn test_markup_nested_entities() {
        let xml = pipeline().markup("A Universidade de São Paulo cresceu.").unwrap();
        assert_eq!(
            xml,
            "<sentence><token>A</token> <ne type=\"ORG\"><token>Universidade</token> \
             <token>de</token> <ne type=\"LOC\"><token>São</token> <token>Paulo</token>\
             </ne></ne> <token>cresceu</token><token>.</token></sentence>"
        );
    }

    #[test]
    fn test_markup_same_start_longer_opens_first() {
        let xml = pipeline().markup("O São Paulo Futebol Clube venceu.").unwrap();
        assert!(xml.contains(
            "<ne type=\"ORG\"><ne type=\"LOC\"><token>São</token> <token>Paulo</token></ne>"
        ));
    }

    #[test]
    fn test_markup_empty_block() {
        assert_eq!(pipeline().markup("").unwrap(), "");
    }

    #[test]
    fn test_markup_preserves_whitespace_only_block() {
        assert_eq!(pipeline().markup("\n").unwrap(), "\n");
    }

    #[test]
    fn test_text_preserved_outside_tags() {
        let text = "  Ontem,\tLula visitou a Amazônia...  e voltou.\n\n";
        let mut sink = RecordingSink::new();
        pipeline().render_block(text, &mut sink).unwrap();
        assert_eq!(sink.rendered_text(), text);
    }

    #[test]
    fn test_tag_balance_per_sentence() {
        let text = "Lula visitou o Banco do Brasil. A Petrobras cresceu.";
        let mut sink = RecordingSink::new();
        pipeline().render_block(text, &mut sink).unwrap();
        let count = |f: &dyn Fn(&Event) -> bool| sink.events.iter().filter(|e| f(e)).count();
        assert_eq!(count(&|e| matches!(e, Event::SentenceOpen)), 2);
        assert_eq!(count(&|e| matches!(e, Event::SentenceClose)), 2);
        assert_eq!(
            count(&|e| matches!(e, Event::EntityOpen(_))),
            count(&|e| matches!(e, Event::EntityClose))
        );
    }

    #[test]
    fn test_markup_escapes_source_text() {
        let xml = pipeline().markup("a & b <c>.").unwrap();
        assert_eq!(
            xml,
            "<sentence><token>a</token> <token>&amp;</token> <token>b</token> \
             <token>&lt;</token><token>c</token><token>&gt;</token><token>.</token></sentence>"
        );
    }

    #[test]
    fn test_run_processes_blocks() {
        let input = "Lula viajou.\n\nFim.\n";
        let mut output = Vec::new();
        pipeline().run(input.as_bytes(), &mut output).unwrap();
        let xml = String::from_utf8(output).unwrap();
        assert_eq!(
            xml,
            "<sentence><ne type=\"PER\"><token>Lula</token></ne> <token>viajou</token>\
             <token>.</token></sentence>\n\n\
             <sentence><token>Fim</token><token>.</token></sentence>\n"
        );
    }

    #[test]
    fn test_run_output_reproduces_text_outside_tags() {
        let input = "Dilma Rousseff falou em Brasília.\n\n\nNada aqui.\n";
        let mut output = Vec::new();
        pipeline().run(input.as_bytes(), &mut output).unwrap();
        let xml = String::from_utf8(output).unwrap();
        // removendo as tags e desfazendo o escape, o texto original volta
        let stripped = strip_tags(&xml);
        assert_eq!(stripped, input);
    }

    #[test]
    fn test_vertical_pipeline() {
        let mut p = pipeline();
        p.set_tokenizer_mode(TokenizerMode::Vertical);
        let xml = p.markup("Lula\nviajou\n").unwrap();
        assert_eq!(
            xml,
            "<sentence><ne type=\"PER\"><token>Lula</token></ne>\n<token>viajou</token>\
             </sentence>\n"
        );
    }

    fn strip_tags(xml: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for c in xml.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.replace("&amp;", "&").replace("&lt;", "<").replace("&gt;", ">")
    }
}
