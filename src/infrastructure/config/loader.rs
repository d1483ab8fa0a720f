//! Hierarchical configuration loading and validation.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{Config, EmbeddingProviderKind};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// store.collection is blank
    #[error("Collection name cannot be empty")]
    EmptyCollection,

    /// store.max_connections is zero
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// chunking.target_size is zero
    #[error("Invalid chunking target_size: {0}. Must be at least 1")]
    InvalidTargetSize(usize),

    /// query.default_k is zero
    #[error("Invalid query default_k: {0}. Must be at least 1")]
    InvalidDefaultK(usize),

    /// embedding.openai.max_batch_size is zero
    #[error("Invalid embedding max_batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    /// embedding.openai.max_concurrency is zero
    #[error("Invalid embedding max_concurrency: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    /// embedding.openai.dimension is zero
    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    /// embedding.openai.base_url is blank
    #[error("Embedding base_url cannot be empty")]
    EmptyBaseUrl,

    /// Initial backoff is not below the cap
    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    /// Unknown logging.level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .codebridge/config.yaml (project config)
    /// 3. .codebridge/local.yaml (project local overrides, optional)
    /// 4. Environment variables (CODEBRIDGE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override the file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("CODEBRIDGE_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".codebridge/config.yaml"))
            .merge(Yaml::file(".codebridge/local.yaml"))
            .merge(Env::prefixed("CODEBRIDGE_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.store.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }

        if config.store.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.store.max_connections,
            ));
        }

        if config.chunking.target_size == 0 {
            return Err(ConfigError::InvalidTargetSize(config.chunking.target_size));
        }

        if config.query.default_k == 0 {
            return Err(ConfigError::InvalidDefaultK(config.query.default_k));
        }

        // The HTTP settings only matter when that backend is selected
        if config.embedding.provider == EmbeddingProviderKind::OpenAi {
            let openai = &config.embedding.openai;
            if openai.base_url.trim().is_empty() {
                return Err(ConfigError::EmptyBaseUrl);
            }
            if openai.dimension == 0 {
                return Err(ConfigError::InvalidDimension(openai.dimension));
            }
            if openai.max_batch_size == 0 {
                return Err(ConfigError::InvalidBatchSize(openai.max_batch_size));
            }
            if openai.max_concurrency == 0 {
                return Err(ConfigError::InvalidConcurrency(openai.max_concurrency));
            }
            if openai.initial_backoff_ms >= openai.max_backoff_ms {
                return Err(ConfigError::InvalidBackoff(
                    openai.initial_backoff_ms,
                    openai.max_backoff_ms,
                ));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
