//! # entag-core — Entidades Nomeadas como Marcação XML Aninhada
//!
//! Este crate implementa um pipeline de Reconhecimento de Entidades Nomeadas
//! (NER) cujo produto é **texto marcado**: a saída reproduz o texto de
//! entrada byte a byte e envolve cada entidade reconhecida em tags XML
//! aninhadas (`<ne type="...">`), com uma tag de sentença por sentença e uma
//! tag por token.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui por um pipeline linear, transformado passo a passo:
//!
//! 1. **Entrada** ([`blocks`]): o texto é lido em blocos de parágrafo.
//! 2. **Tokenização** ([`tokenizer`]): cada bloco é dividido em sentenças e
//!    tokens, preservando os offsets de byte no texto original.
//! 3. **Reconhecimento** ([`recognizer`]): gazetteers e regras identificam
//!    spans de tokens com categoria (PER, ORG, LOC, MISC), possivelmente
//!    aninhados ou começando no mesmo token.
//! 4. **Ordenação** ([`render::sort_entities`]): os spans são ordenados para
//!    emissão aninhada (início crescente; em empate, mais longo primeiro).
//! 5. **Renderização** ([`render`]): um cursor de leitura no texto e uma
//!    pilha de fechamentos pendentes emitem eventos para um
//!    [`render::MarkupSink`]; o sink XML ([`xml`]) os codifica.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use entag_core::{NerModel, NerPipeline};
//!
//! let pipeline = NerPipeline::new(NerModel::builtin()).unwrap();
//! let xml = pipeline.markup("Lula mora em São Paulo.").unwrap();
//! assert!(xml.starts_with("<sentence>"));
//! assert!(xml.contains("<ne type=\"LOC\"><token>São</token> <token>Paulo</token></ne>"));
//! ```

pub mod blocks;
pub mod entity;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod recognizer;
pub mod render;
pub mod tokenizer;
pub mod xml;

pub use entity::{EntityCategory, EntitySpan};
pub use error::{ModelError, RenderError};
pub use model::{Gazetteers, NerModel};
pub use pipeline::{NerPipeline, SentenceAnalysis};
pub use recognizer::Recognizer;
pub use render::{render_sentence, sort_entities, CrossingPolicy, MarkupSink};
pub use tokenizer::{tokenize, tokenize_sentences, Token, TokenizerMode};
pub use xml::XmlSink;
