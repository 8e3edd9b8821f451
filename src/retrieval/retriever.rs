//! Hybrid complaint retriever
//!
//! The single query surface over a built store: embed the query, take the
//! dense and sparse top candidates, fuse the two rankings, and hand back
//! best-first chunks. All state is read-only after construction, so one
//! retriever can serve any number of concurrent callers without locking.

use crate::data::ChunkRecord;
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::retrieval::{
    reciprocal_rank_fusion, tokenize, Bm25Index, FlatIndex, Retriever, SearchResult,
    StoreManifest, RRF_C,
};
use crate::store::VectorStore;
use std::path::Path;
use std::sync::Arc;

/// Hybrid dense + sparse retriever over an immutable complaint store.
pub struct ComplaintRetriever {
    index: FlatIndex,
    bm25: Bm25Index,
    records: Vec<ChunkRecord>,
    manifest: StoreManifest,
    embedder: Arc<dyn Embedder>,
}

impl ComplaintRetriever {
    /// Load the store from `dir` and wire it to the embedder.
    ///
    /// Fails fast when the store was built with a different model or
    /// dimensionality than the embedder provides; serving queries against a
    /// mismatched store would silently return garbage.
    pub fn open(dir: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let store = VectorStore::load(dir)?;
        Self::from_store(store, embedder)
    }

    /// Wrap an already-loaded store.
    pub fn from_store(store: VectorStore, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let (index, records, manifest) = store.into_parts();

        if manifest.model_name != embedder.model_name() {
            return Err(RagError::ModelMismatch {
                stored: manifest.model_name,
                current: embedder.model_name().to_string(),
            });
        }
        if manifest.dimension != embedder.dimension() {
            return Err(RagError::DimensionMismatch {
                expected: manifest.dimension,
                actual: embedder.dimension(),
            });
        }

        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let bm25 = Bm25Index::build(&texts);

        tracing::debug!(
            "Retriever ready: {} chunks, model {}",
            records.len(),
            manifest.model_name
        );

        Ok(Self {
            index,
            bm25,
            records,
            manifest,
            embedder,
        })
    }

    /// Store-level metadata of the corpus being served.
    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    /// Number of chunks available for retrieval.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hybrid retrieval with typed errors.
    ///
    /// Both source rankings are fetched at depth `2 * top_k` before fusion
    /// so a chunk just outside one list's cutoff can still be rescued by the
    /// other. An empty query embeds like any other string but produces no
    /// BM25 tokens, degenerating to a dense-only ranking.
    pub fn try_retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 || self.records.is_empty() {
            return Ok(Vec::new());
        }

        let fetch_k = top_k * 2;

        let query_vector = self.embedder.embed(query)?;
        let dense_hits = self.index.search(&query_vector, fetch_k)?;
        let sparse_hits = self.bm25.top_k(&tokenize(query), fetch_k);

        tracing::debug!(
            "Query produced {} dense and {} sparse candidates",
            dense_hits.len(),
            sparse_hits.len()
        );

        let dense_rows: Vec<usize> = dense_hits.iter().map(|(row, _)| *row).collect();
        let sparse_rows: Vec<usize> = sparse_hits.iter().map(|(row, _)| *row).collect();

        let fused = reciprocal_rank_fusion(&[&dense_rows, &sparse_rows], top_k, RRF_C);

        Ok(fused
            .into_iter()
            .enumerate()
            .map(|(position, (row_id, score))| SearchResult {
                row_id,
                chunk: self.records[row_id].clone(),
                score,
                rank: position + 1,
            })
            .collect())
    }
}

impl Retriever for ComplaintRetriever {
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        self.try_retrieve(query, top_k)
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChunkConfig, Complaint, Product, RecursiveChunker};
    use crate::embedding::{EmbeddingConfig, HashEmbedder};
    use crate::store::StoreBuilder;
    use tempfile::tempdir;

    fn embedder_with(model_name: &str, dimension: usize) -> Arc<dyn Embedder> {
        let config = EmbeddingConfig {
            model_name: model_name.to_string(),
            ..Default::default()
        };
        Arc::new(HashEmbedder::new(config, dimension))
    }

    fn build_store(complaints: &[Complaint], embedder: Arc<dyn Embedder>) -> VectorStore {
        let chunker = RecursiveChunker::new(ChunkConfig {
            chunk_size: 200,
            chunk_overlap: 20,
        })
        .unwrap();
        StoreBuilder::new(chunker, embedder, 8).build(complaints).unwrap()
    }

    fn sample_complaints() -> Vec<Complaint> {
        vec![
            Complaint::new(
                "201".to_string(),
                Product::CreditCard,
                "The bank charged unexpected interest on my credit card balance.".to_string(),
            ),
            Complaint::new(
                "202".to_string(),
                Product::SavingsAccount,
                "My savings account was closed without notice or explanation.".to_string(),
            ),
            Complaint::new(
                "203".to_string(),
                Product::DebtCollection,
                "A debt collector contacted my employer about an old debt.".to_string(),
            ),
        ]
    }

    #[test]
    fn test_retrieve_finds_keyword_match() {
        let embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let store = build_store(&sample_complaints(), embedder.clone());
        let retriever = ComplaintRetriever::from_store(store, embedder).unwrap();

        let results = retriever.try_retrieve("credit card interest", 3).unwrap();

        assert!(!results.is_empty());
        assert_eq!(results[0].chunk.complaint_id, "201");
        assert_eq!(results[0].rank, 1);
        // Best-first ordering.
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_empty_query_degrades_to_dense_only() {
        let embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let store = build_store(&sample_complaints(), embedder.clone());
        let retriever = ComplaintRetriever::from_store(store, embedder).unwrap();

        // No tokens means zero BM25 scores everywhere; dense ranking alone
        // must still come back without an error.
        let results = retriever.try_retrieve("", 5).unwrap();
        assert!(!results.is_empty());
    }

    #[test]
    fn test_retrieve_on_empty_store_returns_empty() {
        let embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let store = build_store(&[], embedder.clone());
        let retriever = ComplaintRetriever::from_store(store, embedder).unwrap();

        assert!(retriever.try_retrieve("anything", 5).unwrap().is_empty());
    }

    #[test]
    fn test_model_name_mismatch_is_fatal() {
        let build_embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let store = build_store(&sample_complaints(), build_embedder);

        let other = embedder_with("bge-small-en-v1.5", 16);
        let result = ComplaintRetriever::from_store(store, other);

        assert!(matches!(result, Err(RagError::ModelMismatch { .. })));
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let build_embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let store = build_store(&sample_complaints(), build_embedder);

        let other = embedder_with("all-MiniLM-L6-v2", 32);
        let result = ComplaintRetriever::from_store(store, other);

        assert!(matches!(result, Err(RagError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_duplicate_chunk_texts_stay_distinguishable() {
        // Two complaints with the same narrative produce chunks with
        // identical text; fusion must keep their rows distinct.
        let embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let duplicates = vec![
            Complaint::new(
                "301".to_string(),
                Product::CreditCard,
                "Duplicate narrative about a disputed late fee.".to_string(),
            ),
            Complaint::new(
                "302".to_string(),
                Product::CreditCard,
                "Duplicate narrative about a disputed late fee.".to_string(),
            ),
        ];
        let store = build_store(&duplicates, embedder.clone());
        let retriever = ComplaintRetriever::from_store(store, embedder).unwrap();

        let results = retriever.try_retrieve("disputed late fee", 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_ne!(results[0].row_id, results[1].row_id);
        let ids: Vec<&str> = results
            .iter()
            .map(|r| r.chunk.complaint_id.as_str())
            .collect();
        assert!(ids.contains(&"301"));
        assert!(ids.contains(&"302"));
    }

    #[test]
    fn test_reload_answers_identically() {
        let embedder = embedder_with("all-MiniLM-L6-v2", 16);
        let store = build_store(&sample_complaints(), embedder.clone());
        let dir = tempdir().unwrap();
        store.save(dir.path()).unwrap();

        // `before` serves the in-memory store that produced the artifacts,
        // `after` what a fresh process would load from disk.
        let before = ComplaintRetriever::from_store(store, embedder.clone()).unwrap();
        let after = ComplaintRetriever::open(dir.path(), embedder).unwrap();

        for query in ["credit card interest", "savings account closed", ""] {
            let a = before.try_retrieve(query, 5).unwrap();
            let b = after.try_retrieve(query, 5).unwrap();

            let rows_a: Vec<usize> = a.iter().map(|r| r.row_id).collect();
            let rows_b: Vec<usize> = b.iter().map(|r| r.row_id).collect();
            assert_eq!(rows_a, rows_b);
        }
    }
}
