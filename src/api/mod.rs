//! Axum HTTP handlers: question answering, ingestion, and health probes.

pub mod ask;
pub mod health;
pub mod ingest;

use axum::http::{HeaderMap, StatusCode};

/// Verify the shared-secret X-API-Key header. Enforced at the boundary,
/// never inside the pipeline.
pub fn require_api_key(
    headers: &HeaderMap,
    shared_secret: &str,
) -> Result<(), (StatusCode, String)> {
    let provided = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided != shared_secret {
        return Err((StatusCode::FORBIDDEN, "Invalid API key".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_valid_key_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("secret"));
        assert!(require_api_key(&headers, "secret").is_ok());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("nope"));
        let err = require_api_key(&headers, "secret").unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_key_rejected() {
        let headers = HeaderMap::new();
        assert!(require_api_key(&headers, "secret").is_err());
    }
}
