use crate::config::WikiConfig;
use crate::services::{GraphQlPageSource, PageSource};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod config;
mod domain;
mod features;
mod services;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PageSource>,
    pub config: Arc<WikiConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // refuse to start on a missing or malformed variable
    let config = WikiConfig::from_env().context("Invalid configuration")?;

    let source = GraphQlPageSource::from_config(&config)
        .context("Failed to build the upstream HTTP client")?;

    info!("Using Wiki.js GraphQL endpoint {}", config.api_url);

    let bind_addr = config.bind_addr;
    let app_state = AppState {
        source: Arc::new(source),
        config: Arc::new(config),
    };

    let app = features::app_router(app_state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
