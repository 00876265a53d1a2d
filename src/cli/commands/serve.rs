use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::app::{self, AppState};
use crate::config::config;

pub async fn handle(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = config();
    config.validate()?;
    info!("Starting Bookmark API in {:?} mode", config.environment);

    let state = AppState::from_config(config).await?;
    let app = app::router(state, config);

    let host = host.unwrap_or_else(|| config.api.host.clone());
    let port = port.unwrap_or(config.api.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Bookmark API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
