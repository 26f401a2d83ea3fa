pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

use crate::{
    config::{get_config, AppConfig},
    router::create_router,
    state::build_app_state,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

/// Serves the API on an already-bound listener.
///
/// Builds the shared state (store, embedder) from `config`, assembles the
/// router and hands both to axum. Taking the listener as a parameter lets
/// tests bind port 0 and learn the real address before the server starts.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(?config, "server configuration loaded");

    let app_state = build_app_state(config).await?;
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Full startup path used by the `server` binary: load `.env`, install the
/// tracing subscriber, resolve configuration, bind the port, then [`run`].
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config(None)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {addr}");

    run(listener, config).await
}
