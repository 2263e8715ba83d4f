//! Curator CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (edit, search, chunks, docs, stats)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, DocsCommands, Mode};
pub use commands::{handle_chunks, handle_docs, handle_edit, handle_search, handle_stats, init};
