//! Bus status routes.
//!
//! - `GET  /api/status` - full status map
//! - `POST /api/status` - set one bus's status

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use bustrack_core::registry::status::StatusMap;
use bustrack_core::BusStatus;

use super::{body, run_blocking, OkMessage};
use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    #[serde(default)]
    pub bus_number: String,
    #[serde(default)]
    pub status: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status).post(set_status))
}

async fn get_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusMap>> {
    let board = run_blocking(move || state.status.all()).await?;
    Ok(Json(board))
}

async fn set_status(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> ApiResult<Json<OkMessage>> {
    let req = body(payload, "Missing required fields")?;

    // Strict enum parse happens before any write touches the board.
    let status = BusStatus::parse(&req.status)?;
    run_blocking(move || state.status.set(&req.bus_number, status)).await?;
    Ok(Json(OkMessage::new("Status updated successfully")))
}
