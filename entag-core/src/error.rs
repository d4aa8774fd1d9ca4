//! Erros do pipeline, separados por fase: configuração (carga de modelo,
//! tokenizador) e renderização (spans estruturalmente inválidos, E/S).
//!
//! Erros de configuração são fatais e reportados uma única vez antes de
//! qualquer saída; erros estruturais dependem da política de renderização.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Falhas ao carregar ou configurar um modelo.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("não foi possível ler o modelo '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("modelo inválido em '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("nenhum tokenizador '{0}' disponível para o modelo")]
    UnknownTokenizer(String),
}

/// Falhas durante a renderização de uma sentença.
///
/// As variantes estruturais indicam spans que não têm representação válida
/// como marcação aninhada; nenhuma delas corrompe o texto já emitido.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Dois spans se sobrepõem parcialmente sem contenção: o novo span
    /// terminaria depois de um fechamento ainda pendente na pilha.
    #[error(
        "spans cruzados: entidade no token {start} (comprimento {length}) \
         ultrapassa o fechamento pendente no token {pending}"
    )]
    CrossingEntity {
        start: usize,
        length: usize,
        pending: usize,
    },
    /// Span com `length_tokens == 0`.
    #[error("entidade de comprimento zero no token {token}")]
    EmptyEntity { token: usize },
    /// Span fora do intervalo de tokens da sentença.
    #[error(
        "entidade fora da sentença: tokens [{start}, {start}+{length}) \
         em uma sentença de {count} tokens"
    )]
    OutOfBounds {
        start: usize,
        length: usize,
        count: usize,
    },
    #[error("falha de E/S na escrita da saída: {0}")]
    Io(#[from] io::Error),
}
