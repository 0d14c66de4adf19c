//! ScholarStream backend — binary entrypoint.
//! Loads configuration, runs a collection pass, and serves the HTTP router.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scholarstream::config::ServerConfig;
use scholarstream::ingest::{self, config::load_sources_default};
use scholarstream::metrics::Metrics;

/// Compact logs by default, JSON lines when LOG_FORMAT=json.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scholarstream=info,ingest=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let metrics = Metrics::init()?;
    let server = ServerConfig::from_env()?;

    let enabled = load_sources_default(&scholarstream::known_sources())
        .context("loading source allowlist")?;
    tracing::info!(sources = ?enabled, "source allowlist (empty = all)");

    let providers = scholarstream::default_providers();
    let report = ingest::run_once(&providers, &enabled, chrono::Utc::now()).await;
    tracing::info!(
        count = report.opportunities.len(),
        skipped = report.skipped,
        duplicates = report.duplicates,
        provider_errors = report.provider_errors,
        "initial collection finished"
    );

    let app = scholarstream::router(Some(&metrics));
    let addr = server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
