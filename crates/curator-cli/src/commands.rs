//! Command implementations for the curator binary.
//!
//! Each handler loads configuration, wires the services it needs, and
//! prints its result as JSON on stdout. The embedding model is loaded only
//! for commands that embed (edit, vector search).

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use tracing::info;

use curator_docs::DocumentStore;
use curator_embeddings::{CandleEmbedder, EmbeddingModel, ModelCache};
use curator_index::{QdrantIndex, VectorIndexClient};
use curator_search::{SearchMode, SearchService};
use curator_sync::ChunkSyncCoordinator;
use curator_types::Settings;

use crate::cli::{Cli, DocsCommands, Mode};

/// Load settings, apply CLI overrides, and initialize logging.
pub fn init(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(log_level) = cli.log_level.as_deref() {
        settings.log_level = log_level.to_string();
    }
    settings.validate().context("Invalid configuration")?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(settings)
}

fn index(settings: &Settings) -> Result<Arc<dyn VectorIndexClient>> {
    let index = QdrantIndex::new(&settings.index_url, &settings.collection)
        .context("Failed to create index client")?;
    Ok(Arc::new(index))
}

/// Load the embedding model, downloading files on first use.
async fn embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingModel>> {
    let cache = ModelCache::new(&settings.model_cache_dir, &settings.model_repo);
    info!(repo = %settings.model_repo, "Loading embedding model");

    // Model load reads weights from disk (or the network); keep it off the
    // async runtime.
    let model = tokio::task::spawn_blocking(move || CandleEmbedder::load(&cache))
        .await
        .context("Embedding model load aborted")?
        .context("Failed to load embedding model")?;
    Ok(Arc::new(model))
}

fn parse_extra(extra: Option<&str>) -> Result<Map<String, Value>> {
    match extra {
        None => Ok(Map::new()),
        Some(raw) => {
            let value: Value =
                serde_json::from_str(raw).context("--extra is not valid JSON")?;
            match value {
                Value::Object(map) => Ok(map),
                _ => bail!("--extra must be a JSON object"),
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Edit one chunk's text and print the sync outcome.
pub async fn handle_edit(
    settings: &Settings,
    id: &str,
    text: &str,
    extra: Option<&str>,
) -> Result<()> {
    let extra = parse_extra(extra)?;
    let index = index(settings)?;
    let embedder = embedder(settings).await?;

    let coordinator = ChunkSyncCoordinator::new(index, embedder);
    let outcome = coordinator.edit_chunk(id, text, extra).await?;
    print_json(&outcome)
}

/// Run a search in the requested mode.
pub async fn handle_search(
    settings: &Settings,
    query: &str,
    mode: Mode,
    limit: usize,
) -> Result<()> {
    let index = index(settings)?;
    let limit = if limit > 0 { limit } else { settings.search_limit };

    let mut service = SearchService::new(index).with_scan_limit(settings.scan_limit);
    let mode = match mode {
        Mode::Lexical => SearchMode::Lexical,
        Mode::Vector => {
            service = service.with_embedder(embedder(settings).await?);
            SearchMode::Vector
        }
    };

    let hits = service.search(mode, query, limit).await?;
    print_json(&hits)
}

/// List all chunks for one document.
pub async fn handle_chunks(settings: &Settings, file_name: &str) -> Result<()> {
    let index = index(settings)?;
    let service = SearchService::new(index);

    let hits = service.chunks_for_document(file_name).await?;
    print_json(&hits)
}

/// Document metadata commands.
pub async fn handle_docs(settings: &Settings, command: DocsCommands) -> Result<()> {
    let store = DocumentStore::new(&settings.metadata_url)
        .context("Failed to create metadata store client")?;

    match command {
        DocsCommands::List {
            page,
            limit,
            search,
        } => {
            let docs = store.list(page, limit, search.as_deref()).await?;
            print_json(&docs)
        }
        DocsCommands::Fix { id, clear } => {
            let doc = store.set_fixed(&id, !clear).await?;
            print_json(&doc)
        }
    }
}

/// Collection and document counts.
pub async fn handle_stats(settings: &Settings) -> Result<()> {
    let index = index(settings)?;
    let store = DocumentStore::new(&settings.metadata_url)
        .context("Failed to create metadata store client")?;

    let chunks = index.point_count().await?;
    let documents = store.counts().await?;

    print_json(&json!({
        "chunks": chunks,
        "documents": documents,
    }))
}
