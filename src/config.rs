use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::history::{FileBucketStore, HistoricalStore};
use crate::pipeline::engine::{EngineConfig, TopicEngine};
use crate::text::resources::{EnglishResources, DEFAULT_TOKEN_PATTERN};

/// Where historical topic buckets are persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// One JSON file per bucket in a cache directory (default)
    File,
    /// A single SQLite database (requires the `sqlite` feature)
    Sqlite,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is a valid setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Directory for the file backend
    pub cache_dir: PathBuf,
    /// Database path for the sqlite backend
    pub db_path: String,
    /// Keywords kept per topic
    pub top_n: usize,
    /// Vocabulary cap for TF-IDF
    pub max_features: usize,
    /// Tokenizer regex override
    pub token_pattern: Option<String>,
    /// Deadline for a single analysis run
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let store_backend = match env::var("TRENDLINE_STORE").as_deref() {
            Ok("sqlite") => StoreBackend::Sqlite,
            Ok("file") | Err(_) => StoreBackend::File,
            Ok(other) => anyhow::bail!(
                "Unknown TRENDLINE_STORE '{other}'. Use 'file' or 'sqlite'."
            ),
        };

        Ok(Self {
            store_backend,
            cache_dir: env::var("TRENDLINE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_cache_dir()),
            db_path: env::var("TRENDLINE_DB_PATH")
                .unwrap_or_else(|_| "./trendline.db".to_string()),
            top_n: parse_var("TRENDLINE_TOP_N", 5)?,
            max_features: parse_var("TRENDLINE_MAX_FEATURES", 1000)?,
            token_pattern: env::var("TRENDLINE_TOKEN_PATTERN").ok(),
            timeout: Duration::from_secs(parse_var("TRENDLINE_TIMEOUT_SECS", 120)?),
        })
    }

    /// Open the configured historical store.
    pub fn open_store(&self) -> Result<HistoricalStore> {
        match self.store_backend {
            StoreBackend::File => Ok(HistoricalStore::new(Box::new(FileBucketStore::new(
                self.cache_dir.clone(),
            )))),
            #[cfg(feature = "sqlite")]
            StoreBackend::Sqlite => {
                let store = crate::history::SqliteBucketStore::open(&self.db_path)?;
                Ok(HistoricalStore::new(Box::new(store)))
            }
            #[cfg(not(feature = "sqlite"))]
            StoreBackend::Sqlite => anyhow::bail!(
                "TRENDLINE_STORE=sqlite but this build has no SQLite support.\n\
                 Rebuild with `--features sqlite` or use TRENDLINE_STORE=file."
            ),
        }
    }

    /// Where the configured store lives, for display.
    pub fn store_location(&self) -> String {
        match self.store_backend {
            StoreBackend::File => self.cache_dir.display().to_string(),
            StoreBackend::Sqlite => self.db_path.clone(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::with_top_n(self.top_n);
        config.vectorizer.max_features = self.max_features;
        config
    }

    /// Build the engine with production language resources and the
    /// configured store.
    pub fn build_engine(&self) -> Result<TopicEngine> {
        let pattern = self.token_pattern.as_deref().unwrap_or(DEFAULT_TOKEN_PATTERN);
        let resources = Arc::new(EnglishResources::with_token_pattern(pattern));
        Ok(TopicEngine::new(
            self.engine_config(),
            resources,
            self.open_store()?,
        ))
    }
}

/// Platform cache directory, e.g. ~/.cache/trendline/topics on Linux.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trendline")
        .join("topics")
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
