//! Vector store persistence
//!
//! A built corpus is two artifacts in one directory: the dense index
//! (opaque binary) and the metadata list (JSON), positionally aligned row
//! for row. Writes go to temporary paths and are renamed into place so a
//! concurrent reader never observes a half-written artifact. Loads verify
//! the alignment and fail as corruption rather than truncate.

use crate::data::{ChunkRecord, Complaint, RecursiveChunker};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::retrieval::{FlatIndex, StoreManifest};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Dense-index artifact file name.
pub const INDEX_FILE: &str = "complaints.index";
/// Metadata artifact file name.
pub const METADATA_FILE: &str = "metadata.json";

/// On-disk shape of the metadata artifact.
#[derive(serde::Serialize, serde::Deserialize)]
struct MetadataArtifact {
    manifest: StoreManifest,
    records: Vec<ChunkRecord>,
}

/// An immutable built corpus: dense index plus aligned chunk metadata.
///
/// The store never changes after construction; rebuilding means discarding
/// it and building a new one from scratch.
pub struct VectorStore {
    index: FlatIndex,
    records: Vec<ChunkRecord>,
    manifest: StoreManifest,
}

impl VectorStore {
    /// Assemble a store from its parts, verifying alignment.
    pub fn new(
        index: FlatIndex,
        records: Vec<ChunkRecord>,
        manifest: StoreManifest,
    ) -> Result<Self> {
        verify_alignment(&index, &records, &manifest)?;
        Ok(Self {
            index,
            records,
            manifest,
        })
    }

    /// The dense index.
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Chunk metadata, in row-id order.
    pub fn records(&self) -> &[ChunkRecord] {
        &self.records
    }

    /// Store-level metadata.
    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    /// Consume the store, yielding its parts.
    pub fn into_parts(self) -> (FlatIndex, Vec<ChunkRecord>, StoreManifest) {
        (self.index, self.records, self.manifest)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Persist both artifacts into `dir`, creating it if absent.
    ///
    /// Existing artifacts are replaced atomically from the reader's
    /// perspective: content is written to temporary paths inside `dir` and
    /// renamed over the destination.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;

        let index_bytes = bincode::serialize(&self.index)
            .map_err(|e| RagError::Persist(format!("failed to encode dense index: {e}")))?;
        let metadata_json = serde_json::to_vec(&MetadataArtifact {
            manifest: self.manifest.clone(),
            records: self.records.clone(),
        })
        .map_err(|e| RagError::Persist(format!("failed to encode metadata: {e}")))?;

        write_atomic(&dir.join(INDEX_FILE), &index_bytes)?;
        write_atomic(&dir.join(METADATA_FILE), &metadata_json)?;

        tracing::info!(
            "Vector store saved to {} ({} chunks, {} dimensions)",
            dir.display(),
            self.records.len(),
            self.index.dimension()
        );
        Ok(())
    }

    /// Load both artifacts from `dir` and verify their alignment.
    pub fn load(dir: &Path) -> Result<Self> {
        let index_path = dir.join(INDEX_FILE);
        let metadata_path = dir.join(METADATA_FILE);

        if !index_path.exists() {
            return Err(RagError::StoreNotFound(index_path));
        }
        if !metadata_path.exists() {
            return Err(RagError::StoreNotFound(metadata_path));
        }

        let index_bytes = fs::read(&index_path)?;
        let index: FlatIndex = bincode::deserialize(&index_bytes)
            .map_err(|e| RagError::CorruptStore(format!("unreadable dense index: {e}")))?;

        let metadata_bytes = fs::read(&metadata_path)?;
        let artifact: MetadataArtifact = serde_json::from_slice(&metadata_bytes)
            .map_err(|e| RagError::CorruptStore(format!("unreadable metadata: {e}")))?;

        let store = Self::new(index, artifact.records, artifact.manifest)?;

        tracing::info!(
            "Vector store loaded from {} ({} chunks, model {})",
            dir.display(),
            store.len(),
            store.manifest.model_name
        );
        Ok(store)
    }
}

fn verify_alignment(
    index: &FlatIndex,
    records: &[ChunkRecord],
    manifest: &StoreManifest,
) -> Result<()> {
    if index.len() != records.len() {
        return Err(RagError::CorruptStore(format!(
            "metadata holds {} records but the dense index holds {} rows",
            records.len(),
            index.len()
        )));
    }
    if manifest.num_chunks != records.len() {
        return Err(RagError::CorruptStore(format!(
            "manifest reports {} chunks but metadata holds {}",
            manifest.num_chunks,
            records.len()
        )));
    }
    if manifest.dimension != index.dimension() {
        return Err(RagError::CorruptStore(format!(
            "manifest reports {} dimensions but the index holds {}",
            manifest.dimension,
            index.dimension()
        )));
    }
    for (position, record) in records.iter().enumerate() {
        if record.row_id != position {
            return Err(RagError::CorruptStore(format!(
                "metadata record at position {position} carries row id {}",
                record.row_id
            )));
        }
    }
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// One-shot builder for the chunk → embed → index pipeline.
///
/// Construction is a single non-resumable pass; a failure anywhere leaves no
/// partially-built usable state behind.
pub struct StoreBuilder {
    chunker: RecursiveChunker,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl StoreBuilder {
    /// Create a builder around a chunker and an embedder handle.
    pub fn new(
        chunker: RecursiveChunker,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
    ) -> Self {
        Self {
            chunker,
            embedder,
            batch_size,
        }
    }

    /// Chunk and embed the complaints and assemble the store.
    ///
    /// Complaints with empty cleaned narratives produce no chunks. Embedding
    /// runs in batches whose outputs keep input order, so row `i` of the
    /// index is always the vector of metadata record `i`.
    pub fn build(&self, complaints: &[Complaint]) -> Result<VectorStore> {
        tracing::info!("Chunking {} complaint narratives", complaints.len());

        let mut records = Vec::new();
        for complaint in complaints {
            for text in self.chunker.split(&complaint.cleaned) {
                records.push(ChunkRecord {
                    row_id: records.len(),
                    complaint_id: complaint.id.clone(),
                    product: complaint.product,
                    text,
                    original_text: complaint.narrative.clone(),
                });
            }
        }

        tracing::info!("Generated {} chunks, embedding in batches", records.len());

        let mut index = FlatIndex::new(self.embedder.dimension());
        for batch in records.chunks(self.batch_size.max(1)) {
            let texts: Vec<&str> = batch.iter().map(|r| r.text.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts)?;
            index.add(&vectors)?;
        }

        let manifest = StoreManifest {
            model_name: self.embedder.model_name().to_string(),
            dimension: self.embedder.dimension(),
            num_chunks: records.len(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        VectorStore::new(index, records, manifest)
    }
}
