//! Answer generation
//!
//! The generator is an external collaborator behind a trait: it consumes the
//! question and the best-first excerpts and returns an answer string. The
//! built-in extractive implementation needs no model and keeps the binary
//! usable offline; an LLM-backed implementation slots in behind the same
//! trait.

use crate::error::Result;
use crate::retrieval::SearchResult;

/// Trait for answer generators.
///
/// `context` is ordered best-first and is never empty: the pipeline declines
/// before invoking the generator when retrieval found nothing.
pub trait Generator: Send + Sync {
    /// Produce an answer to `question` from the retrieved excerpts.
    fn generate(&self, question: &str, context: &[SearchResult]) -> Result<String>;

    /// Get the name of this generator.
    fn name(&self) -> &str;
}

/// Deterministic generator that answers by quoting the top excerpts.
pub struct ExtractiveGenerator {
    /// Maximum excerpts quoted in the answer.
    max_excerpts: usize,
    /// Maximum characters quoted per excerpt.
    snippet_chars: usize,
}

impl ExtractiveGenerator {
    /// Create a generator quoting at most `max_excerpts` excerpts.
    pub fn new(max_excerpts: usize) -> Self {
        Self {
            max_excerpts,
            snippet_chars: 240,
        }
    }
}

impl Default for ExtractiveGenerator {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Generator for ExtractiveGenerator {
    fn generate(&self, question: &str, context: &[SearchResult]) -> Result<String> {
        let mut answer = format!(
            "Based on {} retrieved complaint excerpts relevant to \"{}\":\n",
            context.len(),
            question.trim()
        );

        for (i, result) in context.iter().take(self.max_excerpts).enumerate() {
            answer.push_str(&format!(
                "\n{}. [{}] complaint {}: {}",
                i + 1,
                result.chunk.product,
                result.chunk.complaint_id,
                truncate_snippet(result.content(), self.snippet_chars)
            ));
        }

        Ok(answer)
    }

    fn name(&self) -> &str {
        "extractive"
    }
}

/// Truncate to `max_len` characters, preferring a word boundary.
pub(crate) fn truncate_snippet(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_len).collect();
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &truncated[..last_space]),
        None => format!("{truncated}..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChunkRecord, Product};

    fn result(complaint_id: &str, text: &str) -> SearchResult {
        SearchResult {
            row_id: 0,
            chunk: ChunkRecord {
                row_id: 0,
                complaint_id: complaint_id.to_string(),
                product: Product::DebtCollection,
                text: text.to_string(),
                original_text: text.to_string(),
            },
            score: 0.03,
            rank: 1,
        }
    }

    #[test]
    fn test_extractive_generator_quotes_sources() {
        let generator = ExtractiveGenerator::default();
        let context = vec![
            result("10", "collector called my workplace"),
            result("11", "threatened legal action over settled debt"),
        ];

        let answer = generator.generate("What do collectors do?", &context).unwrap();

        assert!(answer.contains("2 retrieved complaint excerpts"));
        assert!(answer.contains("complaint 10: collector called my workplace"));
        assert!(answer.contains("complaint 11"));
    }

    #[test]
    fn test_extractive_generator_caps_excerpts() {
        let generator = ExtractiveGenerator::new(1);
        let context = vec![result("10", "first"), result("11", "second")];

        let answer = generator.generate("q", &context).unwrap();

        assert!(answer.contains("complaint 10"));
        assert!(!answer.contains("complaint 11"));
    }

    #[test]
    fn test_truncate_snippet_prefers_word_boundary() {
        let text = "this is a long piece of text that needs truncating";
        let truncated = truncate_snippet(text, 20);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 23);
    }

    #[test]
    fn test_truncate_snippet_short_text_unchanged() {
        assert_eq!(truncate_snippet("short", 20), "short");
    }
}
