//! # Application Configuration
//!
//! This module defines the configuration structure for `berea-server` and
//! the logic for loading it from an optional `config.yml` file and
//! environment variables. Every field has a sensible default, so the server
//! can boot with no file at all and be tuned entirely through the
//! environment.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the verse database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// Configuration for the text embedding provider.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Configuration for database behavior.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    8090
}
/// Provides a default value for the `db_url` field if not set in the environment.
fn default_db_url() -> String {
    "db/berea.db".to_string()
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// Full URL of the OpenAI-compatible `/embeddings` endpoint.
    #[serde(default = "default_embedding_api_url")]
    pub api_url: String,
    /// Model name sent with every embedding request. The verse embeddings
    /// in the database must have been produced by the same model.
    #[serde(default = "default_embedding_model")]
    pub model_name: String,
    /// Optional bearer token for hosted providers.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Whole-request deadline for one embedding call, in seconds.
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: default_embedding_api_url(),
            model_name: default_embedding_model(),
            api_key: None,
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

/// Default embedding endpoint: a local LM Studio instance.
fn default_embedding_api_url() -> String {
    "http://localhost:1234/v1/embeddings".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-nomic-embed-text-v1.5".to_string()
}
fn default_embedding_timeout_secs() -> u64 {
    30
}

/// Configuration for database behavior.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Per-query deadline, in seconds. Database work is local and fast, so
    /// this is much tighter than the embedding deadline.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

fn default_query_timeout_secs() -> u64 {
    10
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layering, later sources winning:
/// 1. Serde defaults on the structs above.
/// 2. `config.yml` next to the crate manifest (or the override path, which
///    must then exist). Supports `${VAR}` substitution from the environment.
/// 3. Plain environment variables for top-level keys (`PORT`, `DB_URL`).
/// 4. `BEREA_`-prefixed variables for nested keys, e.g.
///    `BEREA_EMBEDDING__API_URL` for `embedding.api_url`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    let main_config_path = match config_path_override {
        Some(override_path) => {
            let content = read_and_substitute(override_path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{override_path}'."))
            })?;
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            override_path.to_string()
        }
        None => {
            let default_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&default_path)? {
                info!("Loading configuration from '{default_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
            default_path
        }
    };

    let settings = builder
        // Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("BEREA")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    info!(config_path = %main_config_path, port = config.port, "configuration resolved");
    Ok(config)
}
