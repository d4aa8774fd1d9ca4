//! # Tipos de Entidade e Spans de Tokens
//!
//! Define o vocabulário semântico do sistema (categorias de entidade) e o
//! [`EntitySpan`], a unidade que o reconhecedor produz e o renderizador consome:
//! um intervalo contíguo de índices de tokens mais uma categoria.
//!
//! Diferente do esquema BIO token a token, o span descreve a entidade inteira
//! de uma vez, o que permite representar **entidades aninhadas**: um span mais
//! curto pode estar totalmente contido em um mais longo, inclusive começando
//! no mesmo token (ex: "São Paulo" LOC dentro de "São Paulo Futebol Clube" ORG).

use serde::{Deserialize, Serialize};

/// Categorias de entidade reconhecidas pelo sistema.
///
/// | Categoria | Significado      | Exemplos                         |
/// |-----------|------------------|----------------------------------|
/// | PER       | Pessoa           | Lula, Machado de Assis           |
/// | ORG       | Organização      | Petrobras, Banco do Brasil       |
/// | LOC       | Local/Geográfico | São Paulo, Amazônia, Brasil      |
/// | MISC      | Miscelânea       | Copa do Mundo, Lei Áurea         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// **Pessoa**: nomes de humanos reais ou fictícios.
    Per,
    /// **Organização**: empresas, instituições, órgãos públicos, times.
    Org,
    /// **Localização**: países, cidades, estados, regiões, rios.
    Loc,
    /// **Miscelânea**: eventos, leis, programas, o que não couber acima.
    Misc,
}

impl EntityCategory {
    /// Nome da categoria como string estável (usado como atributo na marcação).
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Per => "PER",
            EntityCategory::Org => "ORG",
            EntityCategory::Loc => "LOC",
            EntityCategory::Misc => "MISC",
        }
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Uma entidade reconhecida, expressa como intervalo de índices de tokens.
///
/// O intervalo coberto é `[start_token, start_token + length_tokens)`, com
/// índices locais à lista de tokens da sentença. Vários spans podem começar
/// no mesmo token; um span mais curto pode estar aninhado em um mais longo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Índice do primeiro token da entidade.
    pub start_token: usize,
    /// Quantidade de tokens cobertos (sempre >= 1 para spans válidos).
    pub length_tokens: usize,
    /// Categoria semântica da entidade.
    pub category: EntityCategory,
    /// Confiança da atribuição (0.0 a 1.0).
    pub confidence: f64,
    /// Regra ou recurso que identificou a entidade (ex: "location_gazetteer").
    pub source: String,
}

impl EntitySpan {
    /// Índice do último token pertencente à entidade (inclusivo).
    pub fn end_token(&self) -> usize {
        self.start_token + self.length_tokens - 1
    }

    /// Verifica se dois spans se cruzam: sobrepõem-se parcialmente sem que
    /// nenhum contenha o outro. Spans cruzados não têm representação válida
    /// como marcação aninhada.
    pub fn crosses(&self, other: &EntitySpan) -> bool {
        let (a1, a2) = (self.start_token, self.start_token + self.length_tokens);
        let (b1, b2) = (other.start_token, other.start_token + other.length_tokens);
        a1 < b2 && b1 < a2 && !(a1 <= b1 && b2 <= a2) && !(b1 <= a1 && a2 <= b2)
    }
}
