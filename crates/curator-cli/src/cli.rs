//! CLI argument parsing for the curator binary.

use clap::{Parser, Subcommand, ValueEnum};

/// Corpus Curator
///
/// Keeps chunk text, embeddings, and index payloads in sync, and serves
/// lexical and vector search over the chunk collection.
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/corpus-curator/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Search mode flag.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Case-insensitive substring match over chunk text
    Lexical,
    /// Embedding similarity search
    Vector,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace a chunk's text, regenerating its embedding
    Edit {
        /// Chunk id to edit
        id: String,

        /// Replacement text
        text: String,

        /// Non-text payload fields as a JSON object. The payload write is a
        /// full replace: fields not passed here are dropped from the index.
        #[arg(short, long)]
        extra: Option<String>,
    },

    /// Search the chunk collection
    Search {
        /// Query text
        query: String,

        /// Search mode
        #[arg(short, long, value_enum, default_value = "lexical")]
        mode: Mode,

        /// Maximum results (0 uses the configured default)
        #[arg(long, default_value = "0")]
        limit: usize,
    },

    /// List all chunks belonging to one document
    Chunks {
        /// Document file name
        file_name: String,
    },

    /// Document metadata commands
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },

    /// Show collection and document counts
    Stats,
}

/// Document subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DocsCommands {
    /// List documents, newest first
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long, default_value = "15")]
        limit: u32,

        /// Filter by filename substring
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Mark a document as human-reviewed
    Fix {
        /// Document id
        id: String,

        /// Clear the flag instead of setting it
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
