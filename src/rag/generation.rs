use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::PipelineError;
use crate::llm::chat::{self, ChatMessage};
use crate::pipeline::{Candidate, Generator};

/// Fixed instruction contract for answer generation: answer only from the
/// supplied context, refuse rather than hallucinate, be concise, cite
/// sources when relevant.
const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on provided context.\n\n\
Rules:\n\
- Answer ONLY based on the provided context\n\
- If the context doesn't contain the answer, say \"I don't have enough information to answer this question\"\n\
- Be concise and direct\n\
- Cite the document sources when relevant";

/// Generates answers from retrieved context using the configured chat model.
pub struct AnswerGenerator {
    client: reqwest::Client,
    config: LlmConfig,
}

impl AnswerGenerator {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Generator for AnswerGenerator {
    async fn generate(
        &self,
        query: &str,
        candidates: &[Candidate],
    ) -> Result<String, PipelineError> {
        let context = build_context(candidates);
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("Context:\n{context}\n\nQuestion: {query}\n\nAnswer:")),
        ];

        let answer = chat::complete(&self.client, &self.config, messages)
            .await
            .map_err(PipelineError::GenerationUnavailable)?;

        tracing::info!("Generated answer ({} chars)", answer.len());
        Ok(answer)
    }
}

/// Concatenate candidate texts, each tagged with its source, in the order
/// the upstream stage produced (reranked if reranking ran, else retrieval
/// order).
fn build_context(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("Document: {}\n{}", c.source, c.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, source: &str) -> Candidate {
        Candidate {
            text: text.to_string(),
            source: source.to_string(),
            score: 0.5,
            rerank_score: None,
            original_score: None,
        }
    }

    #[test]
    fn test_context_tags_each_passage_with_source() {
        let ctx = build_context(&[
            candidate("Paris is the capital of France", "france.md"),
            candidate("Berlin is the capital of Germany", "germany.md"),
        ]);

        assert!(ctx.contains("Document: france.md\nParis is the capital of France"));
        assert!(ctx.contains("Document: germany.md\nBerlin is the capital of Germany"));
        assert!(ctx.contains("\n\n---\n\n"));
    }

    #[test]
    fn test_context_preserves_candidate_order() {
        let ctx = build_context(&[candidate("second ranked", "b.md"), candidate("first ranked", "a.md")]);
        let b_pos = ctx.find("second ranked").unwrap();
        let a_pos = ctx.find("first ranked").unwrap();
        assert!(b_pos < a_pos);
    }

    #[test]
    fn test_context_empty_candidates() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_system_prompt_carries_refusal_contract() {
        assert!(SYSTEM_PROMPT.contains("ONLY based on the provided context"));
        assert!(SYSTEM_PROMPT.contains("I don't have enough information"));
    }
}
