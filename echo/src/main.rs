use std::process;

use anyhow::Context;
use echo::{config::Config, handler, server::Server, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!("server failed: {err:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing::info!(
        target: "listener",
        address = %config.server_address,
        version = config.version().unwrap_or("Err"),
        "starting echo server"
    );

    match config.secret() {
        Ok(Some(secret)) => tracing::info!(bytes = secret.len(), "app secret loaded"),
        Ok(None) => tracing::info!("no app secret configured"),
        Err(err) => tracing::warn!(%err, "failed to read app secret"),
    }

    let state = AppState::new(config.static_file.clone());
    let listener = Server::new(config.server(), state, handler::route_request)
        .bind()
        .await?;

    listener.run().await;
    Ok(())
}
