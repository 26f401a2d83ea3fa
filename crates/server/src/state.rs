//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup. The state holds the configuration, the
//! verse store and the embedding client behind `Arc`s, making them cheap to
//! clone into every request handler.

use crate::config::AppConfig;
use berea::providers::db::VerseStore;
use berea::providers::embedding::{HttpEmbedder, TextEmbedder};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The verse database provider.
    pub store: Arc<VerseStore>,
    /// The embedding client. Behind the trait so tests can substitute a
    /// deterministic double.
    pub embedder: Arc<dyn TextEmbedder>,
}

/// Builds the shared application state from the configuration.
///
/// Opens (or creates) the verse database, applies the schema, and
/// constructs the embedding client with its configured deadline.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let embedder = HttpEmbedder::new(
        config.embedding.api_url.clone(),
        config.embedding.model_name.clone(),
        config.embedding.api_key.clone(),
        Duration::from_secs(config.embedding.timeout_secs),
    )?;

    let store = VerseStore::new(&config.db_url)
        .await?
        .with_query_timeout(Duration::from_secs(config.database.query_timeout_secs));
    store.initialize_schema().await?;
    info!(db_url = %config.db_url, "verse store initialized");

    Ok(AppState {
        config: Arc::new(config),
        store: Arc::new(store),
        embedder: Arc::new(embedder),
    })
}
