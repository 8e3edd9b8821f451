//! RAG pipeline orchestration
//!
//! Retrieval feeds context assembly feeds generation. This is the boundary
//! where per-query failures stop propagating: a query that errors inside
//! retrieval or generation degrades to the decline answer so a long-lived
//! process serving many queries never dies on one bad input.

use crate::config::DECLINE_ANSWER;
use crate::error::Result;
use crate::rag::context::ContextBuilder;
use crate::rag::generator::{truncate_snippet, Generator};
use crate::rag::query::{RagQuery, RagResponse, Source};
use crate::retrieval::{Retriever, SearchResult};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for the RAG pipeline.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Maximum characters of context handed to the generator.
    pub max_context_chars: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 4000,
        }
    }
}

impl RagConfig {
    /// Set the context character budget.
    pub fn with_max_context_chars(mut self, chars: usize) -> Self {
        self.max_context_chars = chars;
        self
    }
}

/// Pipeline for complaint question-answering.
pub struct RagPipeline {
    retriever: Arc<dyn Retriever>,
    generator: Box<dyn Generator>,
    context_builder: ContextBuilder,
    config: RagConfig,
}

impl RagPipeline {
    /// Create a pipeline (use [`RagPipelineBuilder`] for ergonomics).
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Box<dyn Generator>,
        config: RagConfig,
    ) -> Self {
        Self {
            retriever,
            generator,
            context_builder: ContextBuilder::new(),
            config,
        }
    }

    /// Answer a question from retrieved complaint context.
    ///
    /// Never returns an error: retrieval failures and empty candidate sets
    /// both resolve to the decline answer with no sources.
    pub fn answer(&self, query: &RagQuery) -> RagResponse {
        let retrieval_start = Instant::now();

        let results = match self.retriever.retrieve(&query.question, query.top_k) {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Retrieval failed for '{}': {e}", query.question);
                Vec::new()
            }
        };
        let retrieval_time_ms = retrieval_start.elapsed().as_millis() as u64;

        if results.is_empty() {
            tracing::warn!("No context retrieved for '{}', declining", query.question);
            return RagResponse {
                answer: DECLINE_ANSWER.to_string(),
                sources: Vec::new(),
                context: String::new(),
                retrieval_time_ms,
                generation_time_ms: 0,
            };
        }

        let context = self
            .context_builder
            .build(&results, self.config.max_context_chars);
        tracing::debug!(
            "Prompt for generator '{}':\n{}",
            self.generator.name(),
            self.context_builder.format_prompt(&query.question, &context)
        );

        let generation_start = Instant::now();
        let answer = match self.generator.generate(&query.question, &results) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Generation failed for '{}': {e}", query.question);
                DECLINE_ANSWER.to_string()
            }
        };
        let generation_time_ms = generation_start.elapsed().as_millis() as u64;

        RagResponse {
            answer,
            sources: results.iter().map(to_source).collect(),
            context,
            retrieval_time_ms,
            generation_time_ms,
        }
    }

    /// Get the retriever reference.
    pub fn retriever(&self) -> &dyn Retriever {
        self.retriever.as_ref()
    }

    /// Get the config.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}

fn to_source(result: &SearchResult) -> Source {
    Source {
        complaint_id: result.chunk.complaint_id.clone(),
        product: result.chunk.product,
        score: result.score,
        snippet: truncate_snippet(result.content(), 200),
    }
}

/// Builder for [`RagPipeline`].
pub struct RagPipelineBuilder {
    retriever: Option<Arc<dyn Retriever>>,
    generator: Option<Box<dyn Generator>>,
    config: RagConfig,
}

impl RagPipelineBuilder {
    /// Create a new pipeline builder.
    pub fn new() -> Self {
        Self {
            retriever: None,
            generator: None,
            config: RagConfig::default(),
        }
    }

    /// Set the retriever.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the generator.
    pub fn generator(mut self, generator: Box<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the config.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<RagPipeline> {
        let retriever = self.retriever.ok_or_else(|| {
            crate::error::RagError::Configuration(
                "a retriever is required to build the pipeline".to_string(),
            )
        })?;
        let generator = self.generator.ok_or_else(|| {
            crate::error::RagError::Configuration(
                "a generator is required to build the pipeline".to_string(),
            )
        })?;

        Ok(RagPipeline::new(retriever, generator, self.config))
    }
}

impl Default for RagPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChunkRecord, Product};
    use crate::error::RagError;
    use crate::rag::generator::ExtractiveGenerator;

    struct StubRetriever {
        results: Vec<SearchResult>,
        fail: bool,
    }

    impl Retriever for StubRetriever {
        fn retrieve(&self, _query: &str, top_k: usize) -> crate::error::Result<Vec<SearchResult>> {
            if self.fail {
                return Err(RagError::Embedding("backend offline".to_string()));
            }
            Ok(self.results.iter().take(top_k).cloned().collect())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn search_result(row_id: usize, text: &str) -> SearchResult {
        SearchResult {
            row_id,
            chunk: ChunkRecord {
                row_id,
                complaint_id: format!("c{row_id}"),
                product: Product::PersonalLoan,
                text: text.to_string(),
                original_text: text.to_string(),
            },
            score: 1.0 / (row_id as f32 + 61.0),
            rank: row_id + 1,
        }
    }

    fn pipeline_with(retriever: StubRetriever) -> RagPipeline {
        RagPipelineBuilder::new()
            .retriever(Arc::new(retriever))
            .generator(Box::new(ExtractiveGenerator::default()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_answer_uses_retrieved_context() {
        let pipeline = pipeline_with(StubRetriever {
            results: vec![search_result(0, "origination fee doubled at closing")],
            fail: false,
        });

        let response = pipeline.answer(&RagQuery::new("What about loan fees?"));

        assert!(response.answer.contains("origination fee"));
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].complaint_id, "c0");
        assert!(response.context.contains("Source 1:"));
    }

    #[test]
    fn test_empty_retrieval_declines() {
        let pipeline = pipeline_with(StubRetriever {
            results: Vec::new(),
            fail: false,
        });

        let response = pipeline.answer(&RagQuery::new("Anything?"));

        assert_eq!(response.answer, DECLINE_ANSWER);
        assert!(response.sources.is_empty());
        assert!(response.context.is_empty());
    }

    #[test]
    fn test_retrieval_failure_degrades_to_decline() {
        let pipeline = pipeline_with(StubRetriever {
            results: Vec::new(),
            fail: true,
        });

        let response = pipeline.answer(&RagQuery::new("Anything?"));
        assert_eq!(response.answer, DECLINE_ANSWER);
    }

    #[test]
    fn test_builder_requires_parts() {
        let result = RagPipelineBuilder::new().build();
        assert!(matches!(result, Err(RagError::Configuration(_))));
    }
}
