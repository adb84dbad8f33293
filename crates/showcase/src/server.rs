use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use registry::{DirectorySource, Registry};

use crate::config::ShowcaseConfig;
use crate::error::{ShowcaseError, ShowcaseResult};

pub mod api;
pub mod assets;
pub mod error;
pub mod openapi;
pub mod pages;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Server {
    /// Discovers projects under `config.projects_dir` and starts serving them.
    pub async fn start(config: ShowcaseConfig) -> ShowcaseResult<Self> {
        let source = DirectorySource::new(config.projects_dir.clone());
        let registry = Registry::from_source(&source)?;
        Self::with_registry(config, registry).await
    }

    pub async fn with_registry(config: ShowcaseConfig, registry: Registry) -> ShowcaseResult<Self> {
        let bind_addr = config.bind_addr()?;
        for path in shadowed_projects(&registry) {
            tracing::warn!("project {path} is shadowed by a built-in endpoint and cannot be reached");
        }
        let state = Arc::new(ServerState { config, registry });
        let app = build_router(state);
        let listener = TcpListener::bind(bind_addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(error) = served {
                tracing::error!("showcase server stopped: {error}");
            }
        });
        tracing::info!("showcase listening on http://{addr}");

        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> ShowcaseResult<()> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| ShowcaseError::Internal("failed to send server shutdown signal".to_string()))
        } else {
            Ok(())
        }
    }

    /// Waits for the serving task to finish after [`Server::shutdown`].
    pub async fn stopped(mut self) -> ShowcaseResult<()> {
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|error| ShowcaseError::Internal(format!("server task failed: {error}")))?;
        }
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

pub(crate) struct ServerState {
    pub(crate) config: ShowcaseConfig,
    pub(crate) registry: Registry,
}

fn build_router(state: Arc<ServerState>) -> Router {
    let config = state.config.clone();
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let api = Router::new()
        .route(&config.route("/api/projects"), get(api::list_projects))
        .route(&config.route("/api/categories"), get(api::list_categories))
        .route(
            &config.route("/api/categories/:slug/projects"),
            get(api::category_projects),
        )
        .route(&config.route("/api/browse"), get(api::browse))
        .route(&config.route("/api/openapi.json"), get(openapi::openapi_json))
        .layer(cors);

    Router::new()
        .route(&config.route("/health"), get(health))
        .route(&config.route("/assets/*path"), get(assets::serve_asset))
        .merge(api)
        .fallback(pages::dispatch)
        .with_state(state)
}

/// First path segments claimed by the fixed routes of [`build_router`].
const RESERVED_SEGMENTS: [&str; 3] = ["api", "assets", "health"];

fn shadowed_projects(registry: &Registry) -> Vec<&str> {
    registry
        .projects()
        .iter()
        .map(|record| record.path.as_str())
        .filter(|path| {
            path.split('/')
                .next()
                .is_some_and(|first| RESERVED_SEGMENTS.contains(&first))
        })
        .collect()
}

async fn health() -> &'static str {
    "ok"
}
