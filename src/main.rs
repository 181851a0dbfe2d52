use axum::routing::{get, post};
use axum::{Json, Router};
use tracing_subscriber::EnvFilter;

use wiki_qa::api;
use wiki_qa::config::Config;
use wiki_qa::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Docs directory: {}", config.docs_dir.display());
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);
    if let Some(url) = &config.reranker.base_url {
        tracing::info!("Reranker: {url}");
    }

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/", get(root))
        .route("/ask", post(api::ask::ask))
        .route("/ingest", post(api::ingest::ingest))
        .route("/health", get(api::health::health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "wiki-qa: RAG question answering API",
        "health": "/health",
    }))
}
