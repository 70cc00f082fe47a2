//! Stop list routes.
//!
//! - `GET  /api/stops` - full stop map
//! - `POST /api/stops` - replace the stop list for one bus

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use bustrack_core::registry::stops::StopMap;

use super::{body, run_blocking, OkMessage};
use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStopsRequest {
    #[serde(default)]
    pub bus_number: String,
    /// `None` when the field was omitted. An omitted list is a shape
    /// error and leaves the stored stops untouched; only an explicit
    /// `[]` clears them.
    pub stops: Option<Vec<String>>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stops", get(list_stops).post(set_stops))
}

async fn list_stops(State(state): State<Arc<AppState>>) -> ApiResult<Json<StopMap>> {
    let stops = run_blocking(move || state.stops.list()).await?;
    Ok(Json(stops))
}

async fn set_stops(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SetStopsRequest>, JsonRejection>,
) -> ApiResult<Json<OkMessage>> {
    let req = body(payload, "Invalid data format")?;
    let stops = req
        .stops
        .ok_or_else(|| ApiError::bad_request("Invalid data format"))?;

    run_blocking(move || state.stops.set(&req.bus_number, &stops)).await?;
    Ok(Json(OkMessage::new("Stops updated successfully")))
}
