//! Sparse retrieval using BM25
//!
//! Okapi BM25 over an inverted index built once from the full corpus of
//! chunk texts. Scores are relative within one corpus; they are not
//! comparable across rebuilds, which is why fusion with the dense ranking is
//! rank-based rather than score-based.

use std::collections::HashMap;

/// Term-frequency saturation parameter.
const K1: f32 = 1.2;
/// Length normalization parameter.
const B: f32 = 0.75;

/// Tokenize text for BM25 indexing and querying.
///
/// Lowercases, strips all non-alphanumeric characters, and splits on
/// whitespace, so "credit-card" becomes the single token "creditcard".
pub fn tokenize(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.to_string())
        .collect()
}

/// BM25 index over a fixed corpus of chunk texts.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    /// Inverted index: term -> [(row_id, term_freq)], row ids ascending.
    postings: HashMap<String, Vec<(usize, u32)>>,
    /// Token count per indexed chunk, indexed by row id.
    doc_lengths: Vec<u32>,
    /// Average token count across the corpus.
    avg_doc_length: f32,
}

impl Bm25Index {
    /// Build the index from the corpus, one document per chunk text.
    ///
    /// Row ids are assigned in input order and match the dense index.
    pub fn build(docs: &[&str]) -> Self {
        let mut postings: HashMap<String, Vec<(usize, u32)>> = HashMap::new();
        let mut doc_lengths = Vec::with_capacity(docs.len());

        for (row_id, doc) in docs.iter().enumerate() {
            let tokens = tokenize(doc);
            doc_lengths.push(tokens.len() as u32);

            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *term_freqs.entry(token).or_insert(0) += 1;
            }
            for (term, freq) in term_freqs {
                postings.entry(term).or_default().push((row_id, freq));
            }
        }

        // Posting lists must stay sorted by row id for deterministic scoring.
        for list in postings.values_mut() {
            list.sort_unstable_by_key(|(row_id, _)| *row_id);
        }

        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            doc_lengths.iter().sum::<u32>() as f32 / doc_lengths.len() as f32
        };

        tracing::debug!(
            "BM25 index built: {} chunks, {} distinct terms",
            doc_lengths.len(),
            postings.len()
        );

        Self {
            postings,
            doc_lengths,
            avg_doc_length,
        }
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    /// BM25 score of every indexed chunk against the query tokens.
    ///
    /// Returns one score per chunk in row-id order, unsorted. An empty token
    /// list yields all zeros.
    pub fn score(&self, query_tokens: &[String]) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.doc_lengths.len()];
        if self.doc_lengths.is_empty() {
            return scores;
        }

        let n = self.doc_lengths.len() as f32;

        for term in query_tokens {
            let Some(list) = self.postings.get(term) else {
                continue;
            };

            let df = list.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();

            for &(row_id, tf) in list {
                let tf = tf as f32;
                let doc_len = self.doc_lengths[row_id] as f32;
                let norm = K1 * (1.0 - B + B * doc_len / self.avg_doc_length);
                scores[row_id] += idf * (tf * (K1 + 1.0)) / (tf + norm);
            }
        }

        scores
    }

    /// Top-k chunks by BM25 score.
    ///
    /// Chunks with zero score are excluded; ties resolve to the lower row id
    /// so rankings are reproducible.
    pub fn top_k(&self, query_tokens: &[String], k: usize) -> Vec<(usize, f32)> {
        let mut ranked: Vec<(usize, f32)> = self
            .score(query_tokens)
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips() {
        assert_eq!(
            tokenize("Unauthorized CHARGE on my credit-card!"),
            vec!["unauthorized", "charge", "on", "my", "creditcard"]
        );
    }

    #[test]
    fn test_tokenize_empty_and_symbolic_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
        assert!(tokenize("$$$ !!! ---").is_empty());
    }

    #[test]
    fn test_score_length_matches_corpus() {
        let index = Bm25Index::build(&[
            "late fee charged twice",
            "wire transfer never arrived",
            "debt collector keeps calling",
        ]);

        let scores = index.score(&tokenize("late fee"));
        assert_eq!(scores.len(), 3);
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_empty_query_scores_all_zero() {
        let index = Bm25Index::build(&["some chunk text", "another chunk"]);
        let scores = index.score(&[]);
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_term_frequency_raises_score() {
        let index = Bm25Index::build(&[
            "interest rate mentioned once here",
            "interest interest interest rate increase",
        ]);

        let ranked = index.top_k(&tokenize("interest"), 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 1);
    }

    #[test]
    fn test_rare_terms_outweigh_common_ones() {
        let index = Bm25Index::build(&[
            "payment payment overdraft",
            "payment problem",
            "payment delay",
        ]);

        // "overdraft" appears in one document, "payment" in all three; the
        // rare-term document must outrank the rest for a mixed query.
        let ranked = index.top_k(&tokenize("payment overdraft"), 3);
        assert_eq!(ranked[0].0, 0);
    }

    #[test]
    fn test_top_k_excludes_zero_scores() {
        let index = Bm25Index::build(&["alpha beta", "gamma delta"]);
        let ranked = index.top_k(&tokenize("alpha"), 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, 0);
    }

    #[test]
    fn test_identical_chunks_tie_break_by_row_id() {
        let index = Bm25Index::build(&["duplicate text", "duplicate text"]);
        let ranked = index.top_k(&tokenize("duplicate"), 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 1);
        assert_eq!(ranked[0].1, ranked[1].1);
    }
}
