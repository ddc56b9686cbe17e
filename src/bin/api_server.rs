use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use geoshare::api::{create_router, AppState};
use geoshare::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("reading configuration")?;
    let state = AppState::from_config(&config).context("creating application state")?;
    if state.analyzer.is_none() {
        info!("GEMINI_API_KEY not set, /api/analyze will answer 503");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;

    info!(address = %config.bind, "geoshare API server listening");
    info!("GET  /api/project?latitude=<lat>&longitude=<lon>");
    info!("GET  /api/unproject?easting=<e>&northing=<n>");
    info!("POST /api/upload (multipart/form-data: csv file)");
    info!("GET  /api/share?latitude=<lat>&longitude=<lon>[&accuracy=<m>][&description=<text>]");
    info!("GET  /api/analyze?latitude=<lat>&longitude=<lon>");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
