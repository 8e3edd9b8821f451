//! Hybrid fusion via Reciprocal Rank Fusion
//!
//! Dense distances and BM25 scores live on incomparable scales, so the two
//! rankings are merged by rank position alone: a chunk at 1-based rank `r`
//! in a source list contributes `1 / (C + r)`, and contributions are summed
//! across the lists the chunk appears in. A chunk ranked well by both
//! systems therefore beats one ranked well by only one.

use std::collections::HashMap;

/// Standard RRF constant.
pub const RRF_C: f32 = 60.0;

/// Fuse ranked candidate lists of row ids into one ranking of size `k`.
///
/// Each input list is ordered best-first. The output is sorted by descending
/// fused score; ties resolve to the lower row id so results are
/// reproducible. Empty input lists contribute nothing, so fusing one empty
/// and one populated list degenerates to the populated ranking.
pub fn reciprocal_rank_fusion(lists: &[&[usize]], k: usize, c: f32) -> Vec<(usize, f32)> {
    let mut scores: HashMap<usize, f32> = HashMap::new();

    for list in lists {
        for (position, &row_id) in list.iter().enumerate() {
            let rank = (position + 1) as f32;
            *scores.entry(row_id).or_insert(0.0) += 1.0 / (c + rank);
        }
    }

    let mut fused: Vec<(usize, f32)> = scores.into_iter().collect();
    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    fused.truncate(k);
    fused
}
