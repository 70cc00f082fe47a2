//! Attendance routes.
//!
//! - `GET  /api/attendance` - full two-level ledger
//! - `POST /api/attendance` - mark a student present today

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use bustrack_core::registry::attendance::Ledger;

use super::{body, run_blocking, OkMessage};
use crate::error::ApiResult;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub bus_number: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/attendance", get(get_attendance).post(mark_attendance))
}

async fn get_attendance(State(state): State<Arc<AppState>>) -> ApiResult<Json<Ledger>> {
    let ledger = run_blocking(move || state.attendance.all()).await?;
    Ok(Json(ledger))
}

async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> ApiResult<Json<OkMessage>> {
    let req = body(payload, "Missing required fields")?;

    let outcome = run_blocking(move || {
        state
            .attendance
            .mark_present_today(&req.bus_number, &req.student_name)
    })
    .await?;

    // A repeat mark is still a success; only the wording changes.
    let message = if outcome.already_marked {
        "Attendance already marked"
    } else {
        "Attendance marked successfully"
    };
    Ok(Json(OkMessage::new(message)))
}
