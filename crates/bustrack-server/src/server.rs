//! Application state and router assembly.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bustrack_core::{
    AttendanceLedger, DriverRegistry, JsonStore, Result as CoreResult, StatusBoard, StopRegistry,
};

use crate::config::Config;
use crate::routes;

/// Shared state for all request handlers. The four registries share
/// one store; each serializes its own mutations internally.
pub struct AppState {
    pub config: Config,
    pub drivers: DriverRegistry,
    pub stops: StopRegistry,
    pub status: StatusBoard,
    pub attendance: AttendanceLedger,
}

impl AppState {
    /// Opens the data directory and wires up the registries. Collection
    /// files are bootstrapped lazily on first access.
    pub fn new(config: Config) -> CoreResult<Self> {
        let store = Arc::new(JsonStore::open(&config.data_dir)?);
        Ok(Self {
            drivers: DriverRegistry::new(store.clone()),
            stops: StopRegistry::new(store.clone()),
            status: StatusBoard::new(store.clone()),
            attendance: AttendanceLedger::new(store),
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Builds the full application router. The portals are browser pages,
/// so CORS stays permissive like the original deployment.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
