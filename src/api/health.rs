use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::HealthResponse;
use crate::state::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /health - Probe the vector index, the LLM backend, and the reranker
/// sidecar. Observability only: the pipeline does not depend on this.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut services = BTreeMap::new();

    services.insert(
        "vector_index".to_string(),
        format!("ok ({} vectors)", state.index.entry_count()),
    );

    services.insert(
        "llm".to_string(),
        probe_llm(&state).await,
    );

    if state.config.reranker.base_url.is_some() {
        services.insert("reranker".to_string(), probe_reranker(&state).await);
    }

    let status = if services.values().all(|v| v.starts_with("ok")) {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        services,
    })
}

async fn probe_llm(state: &AppState) -> String {
    let base_url = &state.config.llm.base_url;
    let url = match state.config.llm.provider.as_str() {
        "ollama" => format!("{base_url}/api/tags"),
        _ => format!("{base_url}/v1/models"),
    };
    probe(&state.http_client, &url).await
}

async fn probe_reranker(state: &AppState) -> String {
    let base_url = state
        .config
        .reranker
        .base_url
        .as_deref()
        .unwrap_or_default();
    probe(&state.http_client, &format!("{}/health", base_url.trim_end_matches('/'))).await
}

async fn probe(client: &reqwest::Client, url: &str) -> String {
    match client.get(url).timeout(PROBE_TIMEOUT).send().await {
        Ok(resp) if resp.status().is_success() => "ok".to_string(),
        Ok(resp) => format!("error: status {}", resp.status()),
        Err(e) => format!("error: {e}"),
    }
}
