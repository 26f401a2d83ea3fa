//! # Common Test Utilities
//!
//! This module centralizes the harness used across the `berea-server`
//! integration tests. `TestApp` spawns the real server on a random port,
//! backed by a temporary database file and an `httpmock` server standing in
//! for the embedding provider. Tests seed data through the shared store and
//! talk to the server over real HTTP.

// Allow unused code because this is a test utility module, and not all
// helpers are used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use berea::providers::db::VerseStore;
use berea_server::{
    config, router,
    state::{build_app_state, AppState},
};
use axum::serve;
use httpmock::MockServer;
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr, path::PathBuf};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
///
/// Spawns the server on a random available port with a temporary database
/// and an embedding endpoint pointed at `mock_server`. The embedding
/// timeout is deliberately short (2s) so provider-timeout tests finish
/// quickly; mocks that should succeed answer instantly anyway.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
embedding:
  api_url: "{}"
  model_name: "mock-embedding-model"
  timeout_secs: 2
database:
  query_timeout_secs: 5
"#,
            db_path.to_str().unwrap(),
            mock_server.url("/v1/embeddings"),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {e}");
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// The verse store backing the running server, for seeding fixtures.
    pub fn store(&self) -> &VerseStore {
        self.app_state.store.as_ref()
    }

    /// Mounts an embeddings mock that answers every request with `vector`.
    /// Returns the mock so tests can assert hit counts.
    pub fn mock_embedding(&self, vector: &[f32]) -> httpmock::Mock<'_> {
        let body = serde_json::json!({ "data": [{ "embedding": vector }] });
        self.mock_server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/v1/embeddings");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
