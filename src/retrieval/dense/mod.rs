//! Dense retrieval over a flat exact index
//!
//! Brute-force nearest neighbor under squared Euclidean distance. Rows are
//! append-only and never reordered, so a row id stays valid for the life of
//! the store. Vectors are stored unnormalized; raw L2 distance is the
//! retrieval signal.

use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};

/// Flat exact nearest-neighbor index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    /// Row-major vector data; row `i` occupies `[i * dimension, (i + 1) * dimension)`.
    vectors: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Embedding dimensionality this index accepts.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.vectors.len() / self.dimension
        }
    }

    /// Whether the index holds no rows.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append rows in call order.
    ///
    /// Rows cannot be removed or updated; rebuilding the store is the only
    /// way to change existing rows.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(RagError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
            self.vectors.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Row `i` as a slice.
    fn row(&self, i: usize) -> &[f32] {
        &self.vectors[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Exact k-nearest-neighbor search.
    ///
    /// Returns `(row_id, squared_distance)` pairs, ascending by distance with
    /// ties broken by the lower row id. Fewer than `k` rows in the index
    /// returns all of them.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<(usize, f32)> = (0..self.len())
            .map(|row_id| (row_id, squared_l2(query, self.row(row_id))))
            .collect();

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits.truncate(k);

        Ok(hits)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
