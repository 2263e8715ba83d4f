//! Configuration loading for corpus-curator.
//!
//! Layered precedence: built-in defaults, then the config file at
//! `~/.config/corpus-curator/config.toml`, then `CURATOR_*` environment
//! variables. CLI flags are applied by the binary on top of the loaded
//! settings.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CuratorError;

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the vector index service.
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Collection holding the chunk points.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Base URL of the document metadata service.
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Upper bound on chunks fetched for a lexical scan.
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// Default result cap for both search modes.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HuggingFace repository of the embedding model.
    #[serde(default = "default_model_repo")]
    pub model_repo: String,

    /// Directory for cached model files.
    #[serde(default = "default_model_cache_dir")]
    pub model_cache_dir: String,
}

fn default_index_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "chunks".to_string()
}

fn default_metadata_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_scan_limit() -> usize {
    500
}

fn default_search_limit() -> usize {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model_repo() -> String {
    "BAAI/bge-large-en-v1.5".to_string()
}

fn default_model_cache_dir() -> String {
    ProjectDirs::from("", "", "corpus-curator")
        .map(|p| p.cache_dir().join("models"))
        .unwrap_or_else(|| PathBuf::from("./models"))
        .to_string_lossy()
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            collection: default_collection(),
            metadata_url: default_metadata_url(),
            scan_limit: default_scan_limit(),
            search_limit: default_search_limit(),
            log_level: default_log_level(),
            model_repo: default_model_repo(),
            model_cache_dir: default_model_cache_dir(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/corpus-curator/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (CURATOR_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, CuratorError> {
        let config_dir = ProjectDirs::from("", "", "corpus-curator")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("index_url", default_index_url())
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("collection", default_collection())
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("metadata_url", default_metadata_url())
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("scan_limit", default_scan_limit() as i64)
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("search_limit", default_search_limit() as i64)
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("model_repo", default_model_repo())
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .set_default("model_cache_dir", default_model_cache_dir())
            .map_err(|e| CuratorError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: CURATOR_INDEX_URL, CURATOR_COLLECTION, CURATOR_SCAN_LIMIT, ...
        builder = builder.add_source(
            Environment::with_prefix("CURATOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| CuratorError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CuratorError::Config(e.to_string()))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), CuratorError> {
        if self.index_url.trim().is_empty() {
            return Err(CuratorError::Config("index_url must not be empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(CuratorError::Config("collection must not be empty".into()));
        }
        if self.metadata_url.trim().is_empty() {
            return Err(CuratorError::Config(
                "metadata_url must not be empty".into(),
            ));
        }
        if self.scan_limit == 0 {
            return Err(CuratorError::Config("scan_limit must be > 0".into()));
        }
        if self.search_limit == 0 {
            return Err(CuratorError::Config("search_limit must be > 0".into()));
        }
        Ok(())
    }
}
