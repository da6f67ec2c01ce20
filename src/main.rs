use anyhow::Context;
use claimnet::{AppState, ClaimNetConfig, HttpServer};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Config file path: first argument, then `CLAIMNET_CONFIG`
fn config_path() -> Option<PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CLAIMNET_CONFIG").ok())
        .map(PathBuf::from)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("claimnet=info")))
        .init();

    info!("ClaimNet fraud network analysis v{}", claimnet::version());

    let config = ClaimNetConfig::load(config_path().as_deref()).context("failed to load configuration")?;
    let state = AppState::from_config(&config).context("failed to initialize application state")?;

    // Serve immediately; requests get 503 until the first run is published
    let warmup = state.clone();
    tokio::spawn(async move {
        match warmup.reload_in_background().await {
            Ok(snapshot) => info!(
                version = snapshot.version,
                entities = snapshot.results.entities.len(),
                "Initial analysis loaded"
            ),
            Err(e) => error!("Initial analysis failed: {}", e),
        }
    });

    HttpServer::new(state, config.bind_address())
        .start()
        .await
        .context("HTTP server failed")?;

    Ok(())
}
