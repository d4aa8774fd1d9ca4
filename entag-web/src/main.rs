//! Servidor Axum: expõe o pipeline NER por HTTP, devolvendo a marcação XML
//! e a análise por sentença em JSON.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use entag_core::{NerModel, NerPipeline, SentenceAnalysis};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Estado compartilhado da aplicação. O pipeline não tem estado mutável,
/// então pode ser compartilhado entre requisições atrás de um `Arc`.
struct AppState {
    pipeline: NerPipeline,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    /// A marcação XML do texto inteiro.
    markup: String,
    /// Tokens e entidades por sentença, na ordem de emissão.
    sentences: Vec<SentenceAnalysis>,
    processing_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Primeiro argumento opcional: caminho de um modelo JSON
    let model = match std::env::args().nth(1) {
        Some(path) => {
            info!("Carregando modelo de {path}");
            match NerModel::load(Path::new(&path)) {
                Ok(model) => model,
                Err(err) => {
                    error!("{err}");
                    process::exit(1);
                }
            }
        }
        None => NerModel::builtin(),
    };

    let pipeline = match NerPipeline::new(model) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Servidor entag em http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}

/// Página de demonstração.
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Análise NER via HTTP POST.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let start = Instant::now();
    let markup = match state.pipeline.markup(&req.text) {
        Ok(markup) => markup,
        Err(err) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": err.to_string()})),
            )
                .into_response();
        }
    };
    let sentences = state.pipeline.analyze_block(&req.text);

    Json(AnalyzeResponse {
        markup,
        sentences,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}
