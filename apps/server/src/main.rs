//! Serves the showcase site.
//!
//! Settings come from the environment (`BASE_PATH`, `SHOWCASE_HOST`, `PORT`,
//! `PROJECTS_DIR`), optionally loaded from a `.env` file in the working
//! directory. `RUST_LOG` controls log output.

use showcase::{Server, ShowcaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ShowcaseConfig::from_env().map_err(|e| e.to_string())?;
    tracing::info!(
        base_path = %config.base_path,
        projects_dir = %config.projects_dir.display(),
        "starting showcase"
    );

    let mut server = Server::start(config).await.map_err(|e| {
        tracing::error!("failed to start server: {e}");
        e.to_string()
    })?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
    }
    tracing::info!("shutting down");

    server.shutdown().map_err(|e| e.to_string())?;
    server.stopped().await.map_err(|e| e.to_string())
}
