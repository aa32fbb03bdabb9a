//! HTTP surface.

mod form;
mod handlers;
pub mod response;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::jobs::{InMemoryJobStore, JobController};
use crate::provider::create_backend;

pub use form::read_submission;
pub use response::{ApiError, SubmitResponse};

/// Shared state handed to every handler.
pub struct AppState {
    pub controller: JobController,
}

impl AppState {
    pub fn new(controller: JobController) -> Self {
        Self { controller }
    }

    /// In-memory store plus the backend the config selects.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let backend = create_backend(config)?;
        let store = Arc::new(InMemoryJobStore::new());
        Ok(Self::new(JobController::new(store, backend)))
    }
}

/// Build the router. `None` lifts axum's default request body cap.
///
/// CORS is allow-all so a browser editor served from another origin can call it.
pub fn router(state: Arc<AppState>, max_body_bytes: Option<usize>) -> Router {
    let body_limit = match max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/api/jobs",
            post(handlers::create_job).get(handlers::list_jobs),
        )
        .route("/api/jobs/{job_id}", get(handlers::get_job))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &RelayConfig) -> Result<(), RelayError> {
    config.validate()?;
    let state = Arc::new(AppState::from_config(config)?);
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        addr = %addr,
        backend = state.controller.backend_name(),
        timeout = ?config.timeout,
        "Starting relay server"
    );

    axum::serve(listener, router(state, config.max_body_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl-C handler unavailable, serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
