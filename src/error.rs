//! Error taxonomy for the retrieval core
//!
//! Construction-time failures (store load, model load) are fatal and abort
//! initialization; per-query failures are degraded to empty results at the
//! pipeline boundary. Callers distinguish the cases by matching on the
//! variant, never by inspecting message text.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by ingestion, store construction, persistence, and search.
#[derive(Debug, Error)]
pub enum RagError {
    /// Missing or unreadable source data or store directory.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required store artifact is absent from the target directory.
    #[error("vector store artifact not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    /// The persisted artifacts disagree with each other or cannot be decoded.
    #[error("corrupt vector store: {0}")]
    CorruptStore(String),

    /// The store was built with a different embedding model.
    #[error("model mismatch: store was built with '{stored}', embedder is '{current}'")]
    ModelMismatch { stored: String, current: String },

    /// Vector dimensionality differs from what the index holds.
    #[error("dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding backend failure.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Answer generation failure.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Failure while writing store artifacts.
    #[error("failed to persist vector store: {0}")]
    Persist(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RagError>;
