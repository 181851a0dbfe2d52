use serde::{Deserialize, Serialize};

/// Ask request, boundary-validated before the pipeline runs:
/// query 1-500 chars, top_k 1-20.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub use_rerank: bool,
}

fn default_top_k() -> usize {
    5
}

pub const MAX_QUERY_CHARS: usize = 500;
pub const MAX_TOP_K: usize = 20;

impl AskRequest {
    /// Boundary input validation. Failures never reach the pipeline.
    pub fn validate(&self) -> Result<(), String> {
        let chars = self.query.trim().chars().count();
        if chars == 0 {
            return Err("query must not be empty".to_string());
        }
        if chars > MAX_QUERY_CHARS {
            return Err(format!("query must be at most {MAX_QUERY_CHARS} characters"));
        }
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(format!("top_k must be between 1 and {MAX_TOP_K}"));
        }
        Ok(())
    }
}

/// Citation for a retrieved chunk.
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    /// Document name (source filename)
    pub document: String,
    /// Chunk identifier
    pub chunk_id: String,
    /// Chunk text preview (at most 200 chars + ellipsis)
    pub text: String,
    /// Relevance score: rerank score when present, else similarity
    pub score: f32,
}

/// Ask response.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub metadata: serde_json::Value,
}

/// Health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub services: std::collections::BTreeMap<String, String>,
}

/// Ingest response.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub status: String,
    pub documents: usize,
    pub chunks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_request_defaults() {
        let req: AskRequest = serde_json::from_str(r#"{"query": "hello"}"#).unwrap();
        assert_eq!(req.top_k, 5);
        assert!(!req.use_rerank);
    }

    #[test]
    fn test_ask_request_explicit_fields() {
        let req: AskRequest =
            serde_json::from_str(r#"{"query": "q", "top_k": 20, "use_rerank": true}"#).unwrap();
        assert_eq!(req.top_k, 20);
        assert!(req.use_rerank);
    }

    #[test]
    fn test_validate_rejects_empty_query() {
        let req = AskRequest {
            query: "   ".to_string(),
            top_k: 5,
            use_rerank: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_query() {
        let req = AskRequest {
            query: "a".repeat(501),
            top_k: 5,
            use_rerank: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_top_k_out_of_range() {
        for top_k in [0usize, 21] {
            let req = AskRequest {
                query: "q".to_string(),
                top_k,
                use_rerank: false,
            };
            assert!(req.validate().is_err(), "top_k={top_k} should be rejected");
        }
    }

    #[test]
    fn test_validate_accepts_bounds() {
        for top_k in [1usize, 20] {
            let req = AskRequest {
                query: "a".repeat(500),
                top_k,
                use_rerank: false,
            };
            assert!(req.validate().is_ok(), "top_k={top_k} should be accepted");
        }
    }
}
