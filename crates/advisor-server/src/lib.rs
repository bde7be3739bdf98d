//! HTTP service for advisor-rs
//!
//! Exposes the analysis pipeline over three endpoints:
//!
//! - `GET /` - service name, version, and endpoint index
//! - `GET /health` - readiness probe
//! - `POST /analyze` - run the full analysis for one ticker
//!
//! Configuration is validated once at startup; the router only exists when
//! both the market-data and LLM credentials were present.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use advisor_stock::{AdvisorConfig, AnalysisPipeline};

pub use error::ApiError;

/// Default bind address, overridable with `ADVISOR_BIND_ADDR`
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The analysis pipeline built at startup
    pub pipeline: Arc<AnalysisPipeline>,
}

/// Build the service router around a pipeline
pub fn build_router(pipeline: Arc<AnalysisPipeline>) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/analyze", post(routes::analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the pipeline from configuration and serve until shutdown
pub async fn run_server(config: AdvisorConfig) -> anyhow::Result<()> {
    let bind_addr =
        std::env::var("ADVISOR_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let pipeline = Arc::new(AnalysisPipeline::new(Arc::new(config))?);
    let router = build_router(pipeline);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("advisor-server listening on {}", bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
