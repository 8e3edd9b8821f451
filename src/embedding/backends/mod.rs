//! Embedding backend implementations
//!
//! The hash backend is always available and fully deterministic; it keeps
//! tests and offline runs independent of model downloads. The fastembed
//! backend provides real sentence embeddings behind the
//! `fastembed-backend` feature.

use crate::embedding::{Embedder, Embedding, EmbeddingConfig};
use crate::error::{RagError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Deterministic embedder that derives vectors from a text hash.
///
/// Identical texts always map to identical vectors, different texts almost
/// always to different ones, which is all the retrieval tests rely on.
pub struct HashEmbedder {
    config: EmbeddingConfig,
    dimension: usize,
}

impl HashEmbedder {
    /// Create a new hash embedder.
    pub fn new(config: EmbeddingConfig, dimension: usize) -> Self {
        Self { config, dimension }
    }

    fn generate(&self, text: &str) -> Embedding {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        let mut state = seed;
        for _ in 0..self.dimension {
            // LCG keeps this reproducible without pulling in an RNG.
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            let value = ((state / 65536) % 10000) as f32 / 10000.0 - 0.5;
            embedding.push(value);
        }
        embedding
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(self.generate(text))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

/// Sentence embedder backed by fastembed's local ONNX models.
///
/// Models download to the local HuggingFace cache on first use; the default
/// `all-MiniLM-L6-v2` is ~90MB and produces 384-dimensional vectors.
#[cfg(feature = "fastembed-backend")]
pub struct FastEmbedder {
    model: Arc<fastembed::TextEmbedding>,
    config: EmbeddingConfig,
    dimension: usize,
}

#[cfg(feature = "fastembed-backend")]
impl FastEmbedder {
    /// Initialize the model named in `config`.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        let (model_id, dimension) = match config.model_name.as_str() {
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" => (EmbeddingModel::AllMiniLML6V2, 384),
            "bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
            "bge-base-en-v1.5" => (EmbeddingModel::BGEBaseENV15, 768),
            other => {
                return Err(RagError::Configuration(format!(
                    "unsupported embedding model: {other}. Supported: \
                     all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5"
                )));
            }
        };

        tracing::info!(
            "Initializing embedding model {} ({dimension} dimensions)",
            config.model_name
        );

        let model = TextEmbedding::try_new(
            InitOptions::new(model_id).with_show_download_progress(true),
        )
        .map_err(|e| RagError::Embedding(format!("model initialization failed: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
            config,
            dimension,
        })
    }
}

#[cfg(feature = "fastembed-backend")]
impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let mut batch = self.embed_batch(&[text])?;
        batch
            .pop()
            .ok_or_else(|| RagError::Embedding("backend returned no vectors".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = self
            .model
            .embed(owned, Some(self.config.batch_size))
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "backend returned {} vectors for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }
        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(RagError::DimensionMismatch {
                    expected: self.dimension,
                    actual: embedding.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

/// Create an embedder by backend name.
pub fn create_embedder(
    backend: &str,
    config: EmbeddingConfig,
    dimension: usize,
) -> Result<Arc<dyn Embedder>> {
    match backend {
        "hash" => Ok(Arc::new(HashEmbedder::new(config, dimension))),
        #[cfg(feature = "fastembed-backend")]
        "fastembed" => Ok(Arc::new(FastEmbedder::new(config)?)),
        #[cfg(not(feature = "fastembed-backend"))]
        "fastembed" => Err(RagError::Configuration(
            "fastembed backend not compiled in; rebuild with --features fastembed-backend"
                .to_string(),
        )),
        other => Err(RagError::Configuration(format!(
            "unknown embedding backend: {other}"
        ))),
    }
}
