//! Command-line interface
//!
//! Implements the build, search, and ask commands over the library.

use crate::data::{ChunkConfig, CsvComplaintLoader, RecursiveChunker};
use crate::embedding::{create_embedder, Embedder, EmbeddingConfig};
use crate::rag::{ExtractiveGenerator, RagPipelineBuilder, RagQuery};
use crate::retrieval::ComplaintRetriever;
use crate::store::StoreBuilder;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

fn make_embedder(model: &str, backend: &str) -> Result<Arc<dyn Embedder>> {
    let config = EmbeddingConfig {
        model_name: model.to_string(),
        ..Default::default()
    };
    // The hash backend takes its dimensionality from here; model backends
    // report their own.
    let embedder = create_embedder(backend, config, 384)
        .context("failed to initialize embedding backend")?;
    Ok(embedder)
}

/// Execute the build command: CSV in, persisted vector store out.
pub fn build(
    input: &Path,
    store_dir: &Path,
    chunk_size: usize,
    chunk_overlap: usize,
    model: &str,
    backend: &str,
) -> Result<()> {
    tracing::info!("Starting index build");
    tracing::info!("  Input: {}", input.display());
    tracing::info!("  Store: {}", store_dir.display());
    tracing::info!("  Chunking: size {chunk_size}, overlap {chunk_overlap}");
    tracing::info!("  Model: {model} ({backend})");

    let complaints = CsvComplaintLoader
        .load(input)
        .context("failed to load complaint data")?;

    let chunker = RecursiveChunker::new(ChunkConfig {
        chunk_size,
        chunk_overlap,
    })?;
    let embedder = make_embedder(model, backend)?;
    let batch_size = EmbeddingConfig::default().batch_size;

    let store = StoreBuilder::new(chunker, embedder, batch_size)
        .build(&complaints)
        .context("index construction failed")?;
    store
        .save(store_dir)
        .context("failed to persist vector store")?;

    println!("\nBuild summary:");
    println!("  Complaints indexed: {}", complaints.len());
    println!("  Chunks: {}", store.len());
    println!("  Store directory: {}", store_dir.display());

    Ok(())
}

/// Execute the search command: print the top-k fused hits for a query.
pub fn search(
    store_dir: &Path,
    query: &str,
    top_k: usize,
    model: &str,
    backend: &str,
) -> Result<()> {
    let embedder = make_embedder(model, backend)?;
    let retriever = ComplaintRetriever::open(store_dir, embedder)
        .context("failed to open vector store")?;

    let results = retriever.try_retrieve(query, top_k)?;

    if results.is_empty() {
        println!("No matching complaints found.");
        return Ok(());
    }

    for result in &results {
        println!(
            "\nHit {} (score {:.4}):",
            result.rank, result.score
        );
        println!("  Complaint: {} ({})", result.chunk.complaint_id, result.chunk.product);
        let preview: String = result.content().chars().take(200).collect();
        println!("  Content: {preview}...");
    }

    Ok(())
}

/// Execute the ask command: full retrieve-then-generate answer.
pub fn ask(
    store_dir: &Path,
    question: &str,
    top_k: usize,
    model: &str,
    backend: &str,
) -> Result<()> {
    let embedder = make_embedder(model, backend)?;
    let retriever = ComplaintRetriever::open(store_dir, embedder)
        .context("failed to open vector store")?;

    let pipeline = RagPipelineBuilder::new()
        .retriever(Arc::new(retriever))
        .generator(Box::new(ExtractiveGenerator::default()))
        .build()?;

    let response = pipeline.answer(&RagQuery::new(question).with_top_k(top_k));
    println!("{response}");

    Ok(())
}
