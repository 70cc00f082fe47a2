//! Driver assignment routes.
//!
//! - `GET    /api/drivers` - full assignment map
//! - `POST   /api/drivers` - create or replace an assignment
//! - `DELETE /api/drivers/{busNumber}` - remove with cascade

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;

use bustrack_core::registry::drivers::AssignmentMap;

use super::{body, run_blocking, OkMessage};
use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDriverRequest {
    #[serde(default)]
    pub bus_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers).post(upsert_driver))
        .route("/drivers/:bus_number", delete(remove_driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> ApiResult<Json<AssignmentMap>> {
    let drivers = run_blocking(move || state.drivers.list()).await?;
    Ok(Json(drivers))
}

async fn upsert_driver(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpsertDriverRequest>, JsonRejection>,
) -> ApiResult<Json<OkMessage>> {
    let req = body(payload, "Missing required fields")?;
    run_blocking(move || state.drivers.upsert(&req.bus_number, &req.name, &req.phone)).await?;
    Ok(Json(OkMessage::new("Driver saved successfully")))
}

/// Removing an assignment cascades to the stop list and status entry
/// for the same bus. A partial failure reports 500 even though the
/// earlier deletions stay applied; re-running completes the cleanup.
async fn remove_driver(
    State(state): State<Arc<AppState>>,
    Path(bus_number): Path<String>,
) -> ApiResult<Json<OkMessage>> {
    run_blocking(move || state.drivers.remove(&bus_number, &state.stops, &state.status)).await?;
    Ok(Json(OkMessage::new("Driver removed successfully")))
}
