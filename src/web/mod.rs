//! REST job-status service
//!
//! Thin glue over the pipeline: uploads land in a spool directory, a split
//! request spawns the pipeline as a background task, and job records are
//! polled over HTTP. All decision logic stays in the pipeline modules.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::MediaEngine;
use crate::jobs::JobStore;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Service settings supplied by the CLI.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    /// Directory uploaded files are spooled into
    pub upload_dir: PathBuf,
    /// Directory job outputs are written under (one subdirectory per job)
    pub output_dir: PathBuf,
    /// Optional directory of static frontend files
    pub static_dir: Option<PathBuf>,
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/upload",
            post(handlers::upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/split", post(handlers::split))
        .route("/api/jobs", get(handlers::list_jobs))
        .route("/api/jobs/:job_id", get(handlers::get_job))
        .route(
            "/api/download/:job_id/:filename",
            get(handlers::download),
        );

    if let Some(static_dir) = &state.options.static_dir {
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the service until interrupted.
pub async fn serve(
    options: ServeOptions,
    store: Arc<dyn JobStore>,
    engine: Arc<dyn MediaEngine>,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&options.upload_dir)
        .await
        .context("creating upload directory")?;
    tokio::fs::create_dir_all(&options.output_dir)
        .await
        .context("creating output directory")?;

    let addr: SocketAddr = format!("{}:{}", options.host, options.port)
        .parse()
        .context("invalid listen address")?;

    let state = AppState {
        store,
        engine,
        options: Arc::new(options),
    };
    let router = build_router(state);

    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding listen address")?;
    axum::serve(listener, router).await.context("serving HTTP")
}
