//! motolens-vp library - Vehicle-to-Parts resolution module
//!
//! Resolves a VIN against the external vehicle catalog provider down to a
//! grouped OEM parts list, exposed over a small HTTP API for the MotoLens
//! mobile app.

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;

pub use error::{ApiError, ApiResult};

use catalog::VinPartsPipeline;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The VIN-to-parts resolution pipeline
    pub pipeline: VinPartsPipeline,
    /// Service start time, for health reporting
    pub startup_time: DateTime<Utc>,
    /// Last pipeline error, for health diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(pipeline: VinPartsPipeline) -> Self {
        Self {
            pipeline,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Record a pipeline error for health diagnostics
    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::vin_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
}
