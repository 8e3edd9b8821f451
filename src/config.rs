//! Pipeline-wide defaults
//!
//! Central place for the knobs shared by the build and query paths. Module
//! configs (`ChunkConfig`, `EmbeddingConfig`, `RagConfig`) take their
//! defaults from here.

/// Maximum characters per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Characters shared between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Number of fused results returned by default.
pub const DEFAULT_TOP_K: usize = 5;

/// Sentence-embedding model used for both indexing and queries.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Default on-disk location of the vector store.
pub const DEFAULT_STORE_DIR: &str = "vector_store";

/// Prompt handed to the generator, with `{context}` and `{question}` slots.
pub const PROMPT_TEMPLATE: &str = "\
You are a financial analyst assistant for CrediTrust. Your task is to answer \
questions about customer complaints. Use the following retrieved complaint \
excerpts to formulate your answer. If the context doesn't contain the answer, \
state that you don't have enough information.

Context: {context}

Question: {question}

Answer:";

/// Fixed reply when retrieval produces no context.
pub const DECLINE_ANSWER: &str =
    "I don't have enough information to answer that question.";
