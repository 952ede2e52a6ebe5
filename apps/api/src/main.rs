mod config;
mod errors;
mod filter;
mod models;
mod routes;
mod source;
mod state;
mod stats;

#[cfg(test)]
mod fixtures;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DatasetLocation};
use crate::filter::FilterSession;
use crate::routes::build_router;
use crate::source::{FileResumeSource, HttpResumeSource, ResumeSource};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-filter v{}", env!("CARGO_PKG_VERSION"));

    let source = build_source(&config)?;
    info!("Dataset source: {}", source.describe());

    // An unreachable upstream at startup is not fatal; the dataset can be
    // reloaded later through POST /api/v1/dataset/reload.
    let records = match source.fetch_all().await {
        Ok(records) => records,
        Err(e) => {
            warn!("Initial dataset load failed, starting empty: {e}");
            Vec::new()
        }
    };

    let session = FilterSession::new(records, config.debounce);
    info!("Filter debounce: {:?}", config.debounce);

    let app = build_router(AppState::new(session, source))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_source(config: &Config) -> Result<Arc<dyn ResumeSource>> {
    Ok(match &config.dataset {
        DatasetLocation::Upstream(url) => {
            Arc::new(HttpResumeSource::new(url, config.upstream_timeout)?)
        }
        DatasetLocation::File(path) => Arc::new(FileResumeSource::new(path.clone())),
    })
}
