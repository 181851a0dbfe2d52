//! Document ingestion: load markdown files, split into overlapping text
//! windows, embed, and upsert into the vector index. The output schema
//! (one vector + source filename per chunk) is the retriever's input
//! contract.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::Config;
use crate::index::VectorIndex;
use crate::llm::embeddings;

#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
}

/// Ingests a markdown corpus into the vector index.
pub struct DocumentIngester {
    client: reqwest::Client,
    config: Config,
    index: Arc<VectorIndex>,
}

impl DocumentIngester {
    pub fn new(client: reqwest::Client, config: Config, index: Arc<VectorIndex>) -> Self {
        Self {
            client,
            config,
            index,
        }
    }

    /// Full pipeline: load → chunk → embed → index. Re-ingesting a document
    /// replaces its previous chunks.
    pub async fn ingest(&self) -> Result<IngestReport> {
        let docs_dir = &self.config.docs_dir;
        tracing::info!("Loading documents from {}", docs_dir.display());

        let mut documents = 0usize;
        let mut chunks_total = 0usize;

        for entry in WalkDir::new(docs_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        {
            let path = entry.path();
            let source = relative_source(docs_dir, path);

            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let chunks = chunk_text(&content, self.config.chunk_size, self.config.chunk_overlap);
            if chunks.is_empty() {
                continue;
            }

            let embeddings =
                embeddings::embed_batch(&self.client, &self.config.llm, &chunks).await?;

            self.index.delete_source(&source)?;
            self.index.add_chunks(&source, &chunks, embeddings)?;

            tracing::info!("Indexed {} chunks from {source}", chunks.len());
            documents += 1;
            chunks_total += chunks.len();
        }

        tracing::info!("Ingestion complete: {documents} documents, {chunks_total} chunks");
        Ok(IngestReport {
            documents,
            chunks: chunks_total,
        })
    }
}

fn relative_source(docs_dir: &Path, path: &Path) -> String {
    path.strip_prefix(docs_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Split text into overlapping windows of at most `chunk_size` characters.
///
/// Window ends snap to the best boundary inside the second half of the
/// window: paragraph break, then line break, then word break, then a hard
/// character cut. Consecutive windows overlap by `overlap` characters.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.trim().is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let overlap = overlap.min(chunk_size.saturating_sub(1));

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let hard_end = (start + chunk_size).min(chars.len());
        let end = if hard_end < chars.len() {
            find_break(&chars, start, hard_end)
        } else {
            hard_end
        };

        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= chars.len() {
            break;
        }
        // Step back by the overlap, but always make forward progress
        start = end.saturating_sub(overlap).max(start + 1);
    }

    chunks
}

/// Best split point in `chars[start..hard_end]`, searched backwards and
/// only past the window midpoint so chunks stay reasonably sized.
fn find_break(chars: &[char], start: usize, hard_end: usize) -> usize {
    let midpoint = start + (hard_end - start) / 2;

    // Paragraph boundary
    for i in (midpoint..hard_end).rev() {
        if chars[i] == '\n' && i > start && chars[i - 1] == '\n' {
            return i + 1;
        }
    }
    // Line boundary
    for i in (midpoint..hard_end).rev() {
        if chars[i] == '\n' {
            return i + 1;
        }
    }
    // Word boundary
    for i in (midpoint..hard_end).rev() {
        if chars[i] == ' ' {
            return i + 1;
        }
    }

    hard_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("", 500, 50).is_empty());
        assert!(chunk_text("   \n\n  ", 500, 50).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Paris is the capital of France.", 500, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Paris is the capital of France.");
    }

    #[test]
    fn test_chunks_never_exceed_chunk_size() {
        let text = "word ".repeat(400);
        let chunks = chunk_text(&text, 100, 20);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too large: {}", chunk.len());
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = "abcdefghij ".repeat(50);
        let chunks = chunk_text(&text, 100, 30);
        assert!(chunks.len() > 1);

        // The tail of each chunk reappears at the head of the next
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(10).collect::<Vec<_>>().into_iter().rev().collect();
            assert!(
                pair[1].contains(&tail),
                "expected overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let para1 = "a".repeat(60);
        let para2 = "b".repeat(60);
        let text = format!("{para1}\n\n{para2}");

        let chunks = chunk_text(&text, 100, 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], para1);
        assert_eq!(chunks[1], para2);
    }

    #[test]
    fn test_hard_cut_without_any_boundary() {
        let text = "x".repeat(250);
        let chunks = chunk_text(&text, 100, 0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
    }

    #[test]
    fn test_relative_source_strips_docs_dir() {
        let docs_dir = Path::new("/data/documents");
        let path = Path::new("/data/documents/squad/france.md");
        assert_eq!(relative_source(docs_dir, path), "squad/france.md");
    }
}
