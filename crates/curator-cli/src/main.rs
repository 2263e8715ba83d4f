//! Corpus Curator CLI
//!
//! Keeps chunk text, embeddings, and index payloads in sync, and serves
//! lexical and vector search over the chunk collection.
//!
//! # Usage
//!
//! ```bash
//! curator edit CHUNK_ID "replacement text" [--extra '{"file_name":"a.pdf"}']
//! curator search "query" [--mode lexical|vector] [--limit N]
//! curator chunks FILE_NAME
//! curator docs list [--page N] [--limit N] [--search TEXT]
//! curator docs fix DOC_ID [--clear]
//! curator stats
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/corpus-curator/config.toml)
//! 3. Environment variables (CURATOR_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use curator_cli::{
    handle_chunks, handle_docs, handle_edit, handle_search, handle_stats, init, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = init(&cli)?;

    match cli.command {
        Commands::Edit { id, text, extra } => {
            handle_edit(&settings, &id, &text, extra.as_deref()).await?;
        }
        Commands::Search { query, mode, limit } => {
            handle_search(&settings, &query, mode, limit).await?;
        }
        Commands::Chunks { file_name } => {
            handle_chunks(&settings, &file_name).await?;
        }
        Commands::Docs { command } => {
            handle_docs(&settings, command).await?;
        }
        Commands::Stats => {
            handle_stats(&settings).await?;
        }
    }

    Ok(())
}
