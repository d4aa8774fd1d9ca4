//! # Renderização de Marcação Aninhada
//!
//! O coração do sistema: transforma uma sentença (texto bruto + tokens +
//! entidades) em uma sequência de eventos de marcação — texto literal,
//! abertura/fechamento de sentença, abertura/fechamento de entidade e texto
//! de token — de modo que:
//!
//! - concatenar os eventos de texto e de token reproduz o texto original
//!   byte a byte (nenhum caractere é perdido, duplicado ou reordenado);
//! - cada entidade abre e fecha exatamente uma vez, com aninhamento válido.
//!
//! ## Algoritmo
//!
//! As entidades são ordenadas por início crescente e, em empate, por
//! comprimento decrescente: quando duas começam no mesmo token, a mais longa
//! abre primeiro e vira a tag externa. A emissão então avança token a token
//! com um cursor de leitura no texto e uma pilha de posições de fechamento
//! (índice do último token de cada entidade aberta). Entidades que terminam
//! no token corrente são fechadas da mais interna para a mais externa, que é
//! exatamente a ordem inversa de abertura.
//!
//! Spans cruzados (sobreposição parcial sem contenção) não têm representação
//! aninhada válida; a [`CrossingPolicy`] decide entre rejeitar a sentença ou
//! descartar o span conflitante.

use serde::{Deserialize, Serialize};
use std::io;

use crate::entity::{EntityCategory, EntitySpan};
use crate::error::RenderError;
use crate::tokenizer::Token;

/// Destino dos eventos de marcação.
///
/// Separa a lógica de aninhamento da codificação concreta da saída (escape
/// XML, aspas de atributo), e permite testar o renderizador sem um stream
/// real.
pub trait MarkupSink {
    /// Texto literal entre tokens (ou após o último), verbatim.
    fn text(&mut self, text: &str) -> io::Result<()>;
    /// Abertura do elemento de sentença.
    fn sentence_open(&mut self) -> io::Result<()>;
    /// Fechamento do elemento de sentença.
    fn sentence_close(&mut self) -> io::Result<()>;
    /// Abertura de uma entidade com sua categoria.
    fn entity_open(&mut self, category: EntityCategory) -> io::Result<()>;
    /// Fechamento da entidade aberta mais recentemente.
    fn entity_close(&mut self) -> io::Result<()>;
    /// O texto do próprio token.
    fn token(&mut self, text: &str) -> io::Result<()>;
}

/// O que fazer quando um span estruturalmente inválido chega ao renderizador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingPolicy {
    /// Falha com [`RenderError`] (padrão).
    Reject,
    /// Descarta o span conflitante e segue renderizando.
    Drop,
}

impl Default for CrossingPolicy {
    fn default() -> Self {
        CrossingPolicy::Reject
    }
}

/// Ordena entidades para emissão aninhada: início crescente e, em empate,
/// comprimento decrescente. A ordenação é estável e idempotente.
pub fn sort_entities(entities: &mut [EntitySpan]) {
    entities.sort_by(|a, b| {
        a.start_token
            .cmp(&b.start_token)
            .then(b.length_tokens.cmp(&a.length_tokens))
    });
}

/// Pilha de posições de fechamento pendentes, uma por entidade aberta.
/// Escopo: uma única chamada de renderização.
struct CloseStack {
    ends: Vec<usize>,
}

impl CloseStack {
    fn new() -> Self {
        CloseStack { ends: Vec::new() }
    }

    fn push(&mut self, end_token: usize) {
        self.ends.push(end_token);
    }

    fn pop(&mut self) -> Option<usize> {
        self.ends.pop()
    }

    fn top(&self) -> Option<usize> {
        self.ends.last().copied()
    }
}

/// Valida um span no momento da abertura e devolve o índice do seu último
/// token. `pending` é o topo da pilha (fechamento mais interno já aberto).
fn check_entity(
    entity: &EntitySpan,
    token_count: usize,
    pending: Option<usize>,
) -> Result<usize, RenderError> {
    if entity.length_tokens == 0 {
        return Err(RenderError::EmptyEntity {
            token: entity.start_token,
        });
    }
    let last = entity.start_token + entity.length_tokens - 1;
    if last >= token_count {
        return Err(RenderError::OutOfBounds {
            start: entity.start_token,
            length: entity.length_tokens,
            count: token_count,
        });
    }
    if let Some(pending) = pending {
        if last > pending {
            return Err(RenderError::CrossingEntity {
                start: entity.start_token,
                length: entity.length_tokens,
                pending,
            });
        }
    }
    Ok(last)
}

/// Renderiza uma sentença, emitindo eventos no sink.
///
/// `cursor` é a posição de leitura corrente no texto do bloco (o primeiro
/// byte ainda não emitido); o valor retornado é o cursor avançado até o fim
/// do último token, para que o chamador continue na próxima sentença e
/// descarregue o texto final do bloco.
///
/// `entities` deve vir ordenado por [`sort_entities`]. Uma sentença sem
/// tokens não emite evento algum.
pub fn render_sentence<S: MarkupSink>(
    text: &str,
    mut cursor: usize,
    tokens: &[Token],
    entities: &[EntitySpan],
    policy: CrossingPolicy,
    sink: &mut S,
) -> Result<usize, RenderError> {
    let mut stack = CloseStack::new();
    let mut e = 0;

    for (i, token) in tokens.iter().enumerate() {
        // 1. Texto literal entre o cursor e o início do token
        if cursor < token.start {
            sink.text(&text[cursor..token.start])?;
        }
        if i == 0 {
            sink.sentence_open()?;
        }

        // 2. Abre as entidades que começam neste token
        while e < entities.len() && entities[e].start_token == i {
            let entity = &entities[e];
            e += 1;
            match check_entity(entity, tokens.len(), stack.top()) {
                Ok(last) => {
                    sink.entity_open(entity.category)?;
                    stack.push(last);
                }
                Err(err) => match policy {
                    CrossingPolicy::Reject => return Err(err),
                    CrossingPolicy::Drop => continue,
                },
            }
        }

        // 3. O próprio token
        sink.token(&text[token.start..token.end])?;

        // 4. Fecha as entidades que terminam neste token, da mais interna
        //    para a mais externa
        while stack.top() == Some(i) {
            stack.pop();
            sink.entity_close()?;
        }

        if i + 1 == tokens.len() {
            sink.sentence_close()?;
        }
        cursor = token.end;
    }

    // Entidades cujo início nunca foi alcançado estão fora da sentença
    if e < entities.len() {
        match policy {
            CrossingPolicy::Reject => {
                return Err(RenderError::OutOfBounds {
                    start: entities[e].start_token,
                    length: entities[e].length_tokens,
                    count: tokens.len(),
                })
            }
            CrossingPolicy::Drop => {}
        }
    }

    Ok(cursor)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Sink de gravação usado pelos testes do crate: registra os eventos em
    //! memória para inspecionar ordem, balanceamento e preservação do texto.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Event {
        Text(String),
        SentenceOpen,
        SentenceClose,
        EntityOpen(EntityCategory),
        EntityClose,
        Token(String),
    }

    pub(crate) struct RecordingSink {
        pub(crate) events: Vec<Event>,
    }

    impl RecordingSink {
        pub(crate) fn new() -> Self {
            RecordingSink { events: Vec::new() }
        }

        /// Concatena os eventos de texto e de token na ordem de emissão.
        pub(crate) fn rendered_text(&self) -> String {
            let mut out = String::new();
            for event in &self.events {
                match event {
                    Event::Text(t) | Event::Token(t) => out.push_str(t),
                    _ => {}
                }
            }
            out
        }
    }

    impl MarkupSink for RecordingSink {
        fn text(&mut self, text: &str) -> io::Result<()> {
            self.events.push(Event::Text(text.to_string()));
            Ok(())
        }
        fn sentence_open(&mut self) -> io::Result<()> {
            self.events.push(Event::SentenceOpen);
            Ok(())
        }
        fn sentence_close(&mut self) -> io::Result<()> {
            self.events.push(Event::SentenceClose);
            Ok(())
        }
        fn entity_open(&mut self, category: EntityCategory) -> io::Result<()> {
            self.events.push(Event::EntityOpen(category));
            Ok(())
        }
        fn entity_close(&mut self) -> io::Result<()> {
            self.events.push(Event::EntityClose);
            Ok(())
        }
        fn token(&mut self, text: &str) -> io::Result<()> {
            self.events.push(Event::Token(text.to_string()));
            Ok(())
        }
    }
}
