use anyhow::{Context, Result};
use yurline::config::Config;

/// Loads the maps script once with the configured key and prints the office link.
pub async fn check(config: Config) -> Result<()> {
    let provider = config.map_provider();
    tracing::info!(provider = provider.name(), "Checking map provider...");

    let link = provider.link(&config.maps.address);
    tracing::info!(
        address = %link.address,
        url = link.url.as_deref().unwrap_or("-"),
        "Office link"
    );

    provider
        .ensure_loaded()
        .await
        .context("maps script is not usable")?;
    tracing::info!("Maps script loaded");

    Ok(())
}
