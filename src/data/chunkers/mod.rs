//! Narrative chunking
//!
//! Splits a cleaned narrative into overlapping windows sized for standalone
//! retrieval. Windows end at the most natural boundary available inside the
//! size limit (paragraph break, then sentence end, then word end) and fall
//! back to a hard character cut. Consecutive chunks always share exactly
//! `chunk_overlap` characters, so concatenating the first chunk with every
//! later chunk minus its first `chunk_overlap` characters reproduces the
//! input. Splitting is deterministic.

use crate::error::{RagError, Result};
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks; must be < `chunk_size`.
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: crate::config::DEFAULT_CHUNK_SIZE,
            chunk_overlap: crate::config::DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Chunker that prefers paragraph, sentence, and word boundaries before
/// cutting mid-word.
pub struct RecursiveChunker {
    config: ChunkConfig,
}

impl RecursiveChunker {
    /// Create a chunker, validating that the overlap leaves room to advance.
    pub fn new(config: ChunkConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(RagError::Configuration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(RagError::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(Self { config })
    }

    /// Create with default configuration.
    pub fn default_config() -> Self {
        Self::new(ChunkConfig::default()).expect("default chunk config is valid")
    }

    /// Split `text` into an ordered sequence of overlapping chunks.
    ///
    /// Empty or whitespace-only input yields an empty sequence.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let paragraph_ends = paragraph_end_positions(&chars);
        let (sentence_ends, word_ends) = segment_end_positions(text);

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + size).min(total);
            let end = if hard_end == total {
                total
            } else {
                // A cut at or before start + overlap would not advance the
                // window, so boundaries must clear that point.
                let min_end = start + overlap + 1;
                pick_boundary(&paragraph_ends, min_end, hard_end)
                    .or_else(|| pick_boundary(&sentence_ends, min_end, hard_end))
                    .or_else(|| pick_boundary(&word_ends, min_end, hard_end))
                    .unwrap_or(hard_end)
            };

            chunks.push(chars[start..end].iter().collect());

            if end == total {
                break;
            }
            start = end - overlap;
        }

        chunks
    }
}

/// Latest boundary in `[min_end, max_end]`, if any.
fn pick_boundary(bounds: &BTreeSet<usize>, min_end: usize, max_end: usize) -> Option<usize> {
    bounds.range(min_end..=max_end).next_back().copied()
}

/// Positions (in chars, exclusive end) immediately after a blank-line break.
fn paragraph_end_positions(chars: &[char]) -> BTreeSet<usize> {
    let mut ends = BTreeSet::new();
    for i in 2..chars.len() {
        if chars[i - 1] == '\n' && chars[i - 2] == '\n' {
            ends.insert(i);
        }
    }
    ends
}

/// Sentence- and word-end positions in char space.
///
/// `unicode-segmentation` reports boundaries as byte offsets; they are mapped
/// to char offsets once so the windowing loop can do pure char arithmetic.
fn segment_end_positions(text: &str) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let byte_to_char = byte_to_char_index(text);

    let sentence_ends = text
        .split_sentence_bound_indices()
        .map(|(offset, segment)| byte_to_char[&(offset + segment.len())])
        .collect();

    let word_ends = text
        .split_word_bound_indices()
        .map(|(offset, segment)| byte_to_char[&(offset + segment.len())])
        .collect();

    (sentence_ends, word_ends)
}

fn byte_to_char_index(text: &str) -> std::collections::HashMap<usize, usize> {
    let mut map = std::collections::HashMap::with_capacity(text.len() + 1);
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        map.insert(byte_idx, char_idx);
    }
    map.insert(text.len(), text.chars().count());
    map
}
