//! RAG query and response types

use crate::data::Product;
use serde::{Deserialize, Serialize};

/// Query input for the RAG pipeline.
#[derive(Debug, Clone)]
pub struct RagQuery {
    /// The user's question.
    pub question: String,
    /// Number of excerpts to retrieve.
    pub top_k: usize,
}

impl RagQuery {
    /// Create a query with the default excerpt count.
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            top_k: crate::config::DEFAULT_TOP_K,
        }
    }

    /// Set the number of excerpts to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Source excerpt reference in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Identifier of the source complaint.
    pub complaint_id: String,
    /// Product category of the source complaint.
    pub product: Product,
    /// Fused relevance score from retrieval.
    pub score: f32,
    /// Text snippet from the matching chunk.
    pub snippet: String,
}

/// Response from the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// Generated answer, or the fixed decline when no context was found.
    pub answer: String,
    /// Source excerpts used, best-first.
    pub sources: Vec<Source>,
    /// Assembled context handed to the generator (for debugging).
    pub context: String,
    /// Retrieval time in milliseconds.
    pub retrieval_time_ms: u64,
    /// Generation time in milliseconds.
    pub generation_time_ms: u64,
}

impl std::fmt::Display for RagResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Answer: {}", self.answer)?;
        writeln!(f, "\nSources ({}):", self.sources.len())?;
        for (i, source) in self.sources.iter().enumerate() {
            writeln!(
                f,
                "  [{}] complaint {} ({}, score {:.4})",
                i + 1,
                source.complaint_id,
                source.product,
                source.score
            )?;
        }
        writeln!(
            f,
            "\nTiming: retrieval={}ms, generation={}ms",
            self.retrieval_time_ms, self.generation_time_ms
        )?;
        Ok(())
    }
}
