//! Retrieval engines
//!
//! Exact dense search, BM25 sparse scoring, and their rank-level fusion.

use crate::data::ChunkRecord;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub mod dense;
pub mod hybrid;
pub mod retriever;
pub mod sparse;

// Re-exports
pub use dense::FlatIndex;
pub use hybrid::{reciprocal_rank_fusion, RRF_C};
pub use retriever::ComplaintRetriever;
pub use sparse::{tokenize, Bm25Index};

/// One retrieved chunk with its fused relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Dense-index row of the chunk.
    pub row_id: usize,
    /// The chunk content and source metadata.
    pub chunk: ChunkRecord,
    /// Relevance score (higher is better).
    pub score: f32,
    /// Rank in the result list (1-indexed).
    pub rank: usize,
}

impl SearchResult {
    /// Chunk text that matched the query.
    pub fn content(&self) -> &str {
        &self.chunk.text
    }
}

/// Store-level metadata persisted alongside the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Model name used for embeddings.
    pub model_name: String,
    /// Embedding dimension.
    pub dimension: usize,
    /// Number of chunks indexed.
    pub num_chunks: usize,
    /// Index creation timestamp.
    pub created_at: String,
}

/// Trait for retrieval engines serving the query surface.
pub trait Retriever: Send + Sync {
    /// Retrieve the top-k most relevant chunks for a query.
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>>;

    /// Get the name of this retriever.
    fn name(&self) -> &str;
}
