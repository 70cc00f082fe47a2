//! HTTP route handlers.
//!
//! Routes and field names follow the original portal contract:
//! requests are camelCase JSON, successes are `{success, message}` (or
//! `{success, driver}` for verification), and errors are
//! `{error: "..."}` with 400/401/500 statuses.

pub mod attendance;
pub mod auth;
pub mod drivers;
pub mod status;
pub mod stops;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

/// `/api` routes.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(drivers::routes())
        .merge(stops::routes())
        .merge(status::routes())
        .merge(attendance::routes())
        .merge(auth::routes())
}

/// Success envelope shared by the mutating endpoints.
#[derive(Debug, Serialize)]
pub struct OkMessage {
    pub success: bool,
    pub message: String,
}

impl OkMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Unwraps a request body, turning any parse failure into the
/// contract's 400 response. Missing fields are not a parse failure;
/// they default to empty and are rejected by core validation.
pub(crate) fn body<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
) -> ApiResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(%rejection, "rejected request body");
            Err(ApiError::bad_request(message))
        }
    }
}

/// Runs a registry call on the blocking thread pool. The registries do
/// synchronous file I/O and may wait on a collection lock; neither
/// belongs on the runtime threads.
pub(crate) async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> bustrack_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(join_error) => Err(ApiError::internal(format!(
            "registry task failed: {join_error}"
        ))),
    }
}
