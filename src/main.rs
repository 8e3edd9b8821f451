use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use complaint_rag::cli;
use complaint_rag::config::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_MODEL, DEFAULT_STORE_DIR, DEFAULT_TOP_K,
};

#[cfg(feature = "fastembed-backend")]
const DEFAULT_BACKEND: &str = "fastembed";
#[cfg(not(feature = "fastembed-backend"))]
const DEFAULT_BACKEND: &str = "hash";

#[derive(Parser)]
#[command(name = "complaint-rag")]
#[command(about = "Hybrid retrieval and question answering over consumer financial complaints", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector store from a complaint CSV export
    Build {
        /// Path to the complaint CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the vector store
        #[arg(short, long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,

        /// Maximum characters per chunk
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Characters shared between consecutive chunks
        #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
        chunk_overlap: usize,

        /// Embedding model name
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Embedding backend: fastembed or hash
        #[arg(short, long, default_value = DEFAULT_BACKEND)]
        backend: String,
    },

    /// Search the store and print the top fused hits
    Search {
        /// The query text
        query: String,

        /// Vector store directory
        #[arg(short, long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,

        /// Number of results to return
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Embedding model name
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Embedding backend: fastembed or hash
        #[arg(short, long, default_value = DEFAULT_BACKEND)]
        backend: String,
    },

    /// Answer a question from retrieved complaint context
    Ask {
        /// The question to answer
        question: String,

        /// Vector store directory
        #[arg(short, long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,

        /// Number of excerpts to retrieve
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Embedding model name
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Embedding backend: fastembed or hash
        #[arg(short, long, default_value = DEFAULT_BACKEND)]
        backend: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            store,
            chunk_size,
            chunk_overlap,
            model,
            backend,
        } => cli::build(&input, &store, chunk_size, chunk_overlap, &model, &backend),
        Commands::Search {
            query,
            store,
            top_k,
            model,
            backend,
        } => cli::search(&store, &query, top_k, &model, &backend),
        Commands::Ask {
            question,
            store,
            top_k,
            model,
            backend,
        } => cli::ask(&store, &question, top_k, &model, &backend),
    }
}
