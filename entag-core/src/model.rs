//! # Modelo NER
//!
//! O modelo agrega os recursos que o reconhecedor consome: as listas de
//! entidades conhecidas (gazetteers, com frases de múltiplas palavras) e o
//! nome do tokenizador a usar. Modelos são documentos JSON carregados do
//! disco; o [`NerModel::builtin`] fornece um modelo PT-BR embutido para que
//! as ferramentas funcionem sem arquivo externo.
//!
//! Falha ao carregar ou um tokenizador desconhecido são erros de
//! configuração: reportados uma vez e fatais, sem modo degradado.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::tokenizer::TokenizerMode;

/// Listas de entidades conhecidas, por categoria. Cada entrada pode ser uma
/// frase de múltiplas palavras ("Universidade de São Paulo"); frases são
/// segmentadas com o mesmo tokenizador do texto de entrada na construção do
/// reconhecedor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gazetteers {
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
}

/// Um modelo NER completo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerModel {
    pub name: String,
    pub version: u32,
    /// Idioma coberto pelos gazetteers (informativo).
    pub language: String,
    /// Nome do tokenizador exigido pelo modelo ("standard" ou "vertical").
    pub tokenizer: String,
    pub gazetteers: Gazetteers,
}

impl NerModel {
    /// Carrega um modelo JSON do disco.
    pub fn load(path: &Path) -> Result<NerModel, ModelError> {
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve o tokenizador nomeado pelo modelo. Nome desconhecido é erro
    /// de configuração fatal, detectado na inicialização e não por chamada.
    pub fn tokenizer_mode(&self) -> Result<TokenizerMode, ModelError> {
        match self.tokenizer.as_str() {
            "standard" => Ok(TokenizerMode::Standard),
            "vertical" => Ok(TokenizerMode::Vertical),
            other => Err(ModelError::UnknownTokenizer(other.to_string())),
        }
    }

    /// Modelo padrão embutido, com gazetteers PT-BR compilados manualmente.
    ///
    /// As listas incluem frases que se aninham de propósito: "Universidade
    /// de São Paulo" (ORG) contém "São Paulo" (LOC), e "São Paulo Futebol
    /// Clube" (ORG) começa no mesmo token que "São Paulo" (LOC).
    pub fn builtin() -> NerModel {
        let persons = [
            "Lula",
            "Dilma Rousseff",
            "Fernando Henrique Cardoso",
            "Machado de Assis",
            "Clarice Lispector",
            "Carlos Drummond de Andrade",
            "Ayrton Senna",
            "Pelé",
            "Chico Buarque",
            "Santos Dumont",
        ];
        let locations = [
            "Brasil",
            "Brasília",
            "São Paulo",
            "Rio de Janeiro",
            "Minas Gerais",
            "Amazônia",
            "Nordeste",
            "Copacabana",
            "Paraná",
            "Portugal",
            "Argentina",
        ];
        let organizations = [
            "Petrobras",
            "Embraer",
            "Correios",
            "Banco do Brasil",
            "Banco Central",
            "Universidade de São Paulo",
            "Universidade Federal do Rio de Janeiro",
            "Supremo Tribunal Federal",
            "São Paulo Futebol Clube",
            "Companhia Vale do Rio Doce",
        ];
        let misc = [
            "Copa do Mundo",
            "Jogos Olímpicos",
            "Carnaval",
            "Operação Lava Jato",
            "Lei Áurea",
            "Bolsa Família",
            "COVID-19",
        ];

        NerModel {
            name: "entag-ptbr-base".to_string(),
            version: 1,
            language: "pt-BR".to_string(),
            tokenizer: "standard".to_string(),
            gazetteers: Gazetteers {
                persons: to_owned(&persons),
                locations: to_owned(&locations),
                organizations: to_owned(&organizations),
                misc: to_owned(&misc),
            },
        }
    }
}

fn to_owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|e| e.to_string()).collect()
}
