//! Embedding generation
//!
//! Trait-based embedding interface. The same embedder handle is injected
//! into index construction and query-time retrieval so the two can never
//! disagree on the model; tests substitute the deterministic hash backend.

use crate::error::Result;
use serde::{Deserialize, Serialize};

pub mod backends;

// Re-exports
pub use backends::{create_embedder, HashEmbedder};

#[cfg(feature = "fastembed-backend")]
pub use backends::FastEmbedder;

/// An embedding vector.
pub type Embedding = Vec<f32>;

/// Configuration for embedding generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name.
    pub model_name: String,
    /// Number of texts embedded per backend call.
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: crate::config::DEFAULT_MODEL.to_string(),
            batch_size: 32,
        }
    }
}

/// Trait for embedding models.
///
/// Implementations must produce one fixed-length vector per input, in input
/// order, and fail the whole call rather than return partial results.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embed multiple texts in batch, preserving input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Get the model name.
    fn model_name(&self) -> &str;
}
