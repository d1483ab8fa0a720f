//! Configuration model, one section per component.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::chunking::ChunkingConfig;
use super::embedding::EmbeddingModel;

/// Main configuration structure for codebridge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Persistent vector store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Chunk size and overlap
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding backend selection
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Where documents are read from
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Query defaults
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vector store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one sub-directory per collection
    pub data_dir: PathBuf,

    /// Collection name; the only required key
    pub collection: String,

    /// Maximum pooled `SQLite` connections
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/vectordb"),
            collection: "code_docs".to_string(),
            max_connections: 5,
        }
    }
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Deterministic in-process embeddings
    #[default]
    Local,
    /// OpenAI-compatible HTTP endpoint (OpenAI, Ollama, ...)
    OpenAi,
}

/// Embedding configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend selection
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// Model used by the local backend
    #[serde(default)]
    pub local_model: EmbeddingModel,

    /// Settings for the HTTP backend
    #[serde(default)]
    pub openai: OpenAiEmbeddingConfig,
}

/// Configuration for an OpenAI-compatible embedding endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiEmbeddingConfig {
    /// API key. Falls back to `OPENAI_API_KEY`; local servers need none.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the API
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Expected embedding dimension
    pub dimension: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum texts per request
    pub max_batch_size: usize,
    /// Maximum requests in flight for one `embed` call
    pub max_concurrency: usize,
    /// Retries for transient failures (429, 5xx, network)
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds, doubled per attempt
    pub initial_backoff_ms: u64,
    /// Upper bound for a single backoff in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "http://localhost:11434/v1".to_string(),
            model: "all-minilm".to_string(),
            dimension: 384,
            timeout_secs: 30,
            max_batch_size: 256,
            max_concurrency: 4,
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

/// Document source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Directory of scraped `.txt` documents
    pub docs_dir: PathBuf,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("data/docs"),
        }
    }
}

/// Query defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of results returned when the caller does not ask for a count
    pub default_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { default_k: 3 }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable multi-line output
    #[default]
    Pretty,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// New file every day
    #[default]
    Daily,
    /// New file every hour
    Hourly,
    /// Single file
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Terminal output format
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files; terminal only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Emit events to stderr
    #[serde(default = "default_true")]
    pub enable_stderr: bool,

    /// Log file rotation
    #[serde(default)]
    pub rotation: RotationPolicy,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_dir: None,
            enable_stderr: true,
            rotation: RotationPolicy::default(),
        }
    }
}

const fn default_true() -> bool {
    true
}
