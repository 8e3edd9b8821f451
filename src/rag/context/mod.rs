//! Context assembly for generation
//!
//! Formats retrieved excerpts into the numbered context block and fills the
//! analyst prompt template around it.

use crate::config::PROMPT_TEMPLATE;
use crate::retrieval::SearchResult;

/// Builds generator input from retrieved excerpts.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new() -> Self {
        Self
    }

    /// Format excerpts as a numbered context block, best-first.
    ///
    /// Stops adding excerpts once `max_chars` would be exceeded; at least
    /// the first excerpt is always included so a non-empty result set never
    /// produces an empty context.
    pub fn build(&self, results: &[SearchResult], max_chars: usize) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            let block = format!("Source {}:\n{}", i + 1, result.content().trim());
            let separator = if context.is_empty() { "" } else { "\n\n" };

            if !context.is_empty() && context.len() + separator.len() + block.len() > max_chars {
                break;
            }
            context.push_str(separator);
            context.push_str(&block);
        }

        context
    }

    /// Fill the prompt template with the question and assembled context.
    pub fn format_prompt(&self, question: &str, context: &str) -> String {
        PROMPT_TEMPLATE
            .replace("{context}", context)
            .replace("{question}", question)
    }
}
