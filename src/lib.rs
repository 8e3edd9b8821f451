//! # complaint-rag
//!
//! Hybrid retrieval and question answering over consumer financial
//! complaints.
//!
//! ## Overview
//!
//! The crate builds a durable vector store over chunked complaint
//! narratives and answers natural-language questions by fusing dense
//! (embedding-similarity) and sparse (BM25) rankings:
//!
//! - Complaint CSV ingestion and narrative cleaning
//! - Overlapping boundary-aware chunking
//! - Embedding generation behind an injected trait handle
//! - Exact nearest-neighbor search over a flat L2 index
//! - Corpus-wide BM25 scoring
//! - Reciprocal Rank Fusion of the two rankings
//! - Atomic two-artifact persistence with alignment verification
//!
//! ## Architecture
//!
//! - `data` - complaint records, chunking, CSV ingestion
//! - `embedding` - embedding trait and backends
//! - `retrieval` - dense, sparse, and hybrid retrieval
//! - `store` - persistence of the built corpus
//! - `rag` - retrieve-then-generate question answering
//! - `cli` - command-line interface
//!
//! After construction a store is immutable: queries share it read-only
//! across any number of threads, and rebuilding replaces it wholesale.

// Core modules
pub mod cli;
pub mod config;
pub mod data;
pub mod embedding;
pub mod error;
pub mod rag;
pub mod retrieval;
pub mod store;

// Re-export commonly used types
pub use error::{RagError, Result};
