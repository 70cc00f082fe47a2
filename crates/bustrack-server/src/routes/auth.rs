//! Role authentication routes.
//!
//! - `POST /api/verify-driver` - check a driver's name against the
//!   bus's assignment
//! - `POST /api/admin-login` - administrator shared-secret check

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use bustrack_core::BusAssignment;

use super::{body, run_blocking, OkMessage};
use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDriverRequest {
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub bus_number: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyDriverResponse {
    pub success: bool,
    pub driver: BusAssignment,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub password: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/verify-driver", post(verify_driver))
        .route("/admin-login", post(admin_login))
}

async fn verify_driver(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyDriverRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyDriverResponse>> {
    let req = body(payload, "Missing required fields")?;
    let driver =
        run_blocking(move || state.drivers.verify(&req.bus_number, &req.driver_name)).await?;
    Ok(Json(VerifyDriverResponse {
        success: true,
        driver,
    }))
}

async fn admin_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> ApiResult<Json<OkMessage>> {
    let req = body(payload, "Missing required fields")?;
    if req.password != state.config.admin_password {
        return Err(ApiError::unauthorized("Invalid admin password"));
    }
    Ok(Json(OkMessage::new("Admin login successful")))
}
