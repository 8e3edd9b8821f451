//! Question answering over retrieved complaint excerpts
//!
//! Orchestrates retrieval and generation. The retrieval core guarantees
//! best-first ordering and uses an empty result list to mean "insufficient
//! context"; the pipeline turns that into a fixed decline instead of letting
//! the generator fabricate an answer.

pub mod context;
pub mod generator;
pub mod pipeline;
pub mod query;

// Re-exports
pub use context::ContextBuilder;
pub use generator::{ExtractiveGenerator, Generator};
pub use pipeline::{RagConfig, RagPipeline, RagPipelineBuilder};
pub use query::{RagQuery, RagResponse, Source};
