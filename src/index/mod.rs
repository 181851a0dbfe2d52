//! In-memory vector index with cosine similarity search and disk
//! persistence. Populated by the ingestion pipeline (one vector + source
//! filename per chunk) and queried by the retriever.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A stored vector entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorEntry {
    source: String,
    chunk_index: usize,
    text: String,
    embedding: Vec<f32>,
}

/// One nearest-neighbor search hit.
#[derive(Debug, Clone)]
pub struct IndexHit {
    pub source: String,
    pub chunk_index: usize,
    pub text: String,
    pub score: f32,
}

/// In-memory vector index backed by a JSON file.
pub struct VectorIndex {
    entries: RwLock<Vec<VectorEntry>>,
    persist_path: std::path::PathBuf,
}

impl VectorIndex {
    pub fn open_or_create(vector_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(vector_dir)?;
        let persist_path = vector_dir.join("vectors.json");

        let entries = if persist_path.exists() {
            let data =
                std::fs::read_to_string(&persist_path).context("Failed to read vector index")?;
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            persist_path,
        })
    }

    /// Add chunk vectors for one source document. `embeddings` must be
    /// parallel with `texts`.
    pub fn add_chunks(
        &self,
        source: &str,
        texts: &[String],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<()> {
        let mut entries = self.entries.write();

        for (i, text) in texts.iter().enumerate() {
            if let Some(embedding) = embeddings.get(i) {
                entries.push(VectorEntry {
                    source: source.to_string(),
                    chunk_index: i,
                    text: text.clone(),
                    embedding: embedding.clone(),
                });
            }
        }

        // Persist to disk
        let data = serde_json::to_string(&*entries)?;
        std::fs::write(&self.persist_path, data)?;

        Ok(())
    }

    /// Drop all entries for one source (used when re-ingesting a document).
    pub fn delete_source(&self, source: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.retain(|e| e.source != source);

        let data = serde_json::to_string(&*entries)?;
        std::fs::write(&self.persist_path, data)?;
        Ok(())
    }

    /// Search by cosine similarity against a query embedding. Results are
    /// sorted descending by score; ties keep storage order (stable sort).
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<IndexHit> {
        let entries = self.entries.read();

        let mut scored: Vec<(f32, &VectorEntry)> = entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, e)| IndexHit {
                source: e.source.clone(),
                chunk_index: e.chunk_index,
                text: e.text.clone(),
                score,
            })
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
