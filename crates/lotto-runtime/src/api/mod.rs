//! # HTTP API
//!
//! | Method | Path                | Body                                   |
//! |--------|---------------------|----------------------------------------|
//! | POST   | `/predict`          | `{"count": 5, "requester": "..."}`     |
//! | POST   | `/check`            | `{"numbers": [..6]}`                   |
//! | POST   | `/results`          | `{"draw_no": 1121, "numbers": [..6]}`  |
//! | GET    | `/results/:draw_no` | query `?requester=...` (optional)      |
//! | GET    | `/health`           |                                        |
//! | GET    | `/metrics`          |                                        |
//!
//! Every error, including an unreadable JSON body, is answered with
//! `{"error": {"code": ..., "message": ...}}`.

mod error;
mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use lotto_generation::{GenerationMetrics, PredictionApi};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::container::Container;

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn PredictionApi>,
    pub metrics: Arc<GenerationMetrics>,
}

impl From<&Container> for AppState {
    fn from(container: &Container) -> Self {
        Self {
            api: Arc::clone(&container.api),
            metrics: Arc::clone(&container.metrics),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/check", post(handlers::check))
        .route("/results", post(handlers::record_draw))
        .route("/results/:draw_no", get(handlers::compare_draw))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
}

/// Serve until `shutdown` flips to `true`.
pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            // A dropped sender also ends the wait.
            let _ = shutdown.wait_for(|stop| *stop).await;
            info!("HTTP API shutting down");
        })
        .await
}
