//! Claim endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use lostfound_common::models::{Claim, ClaimStatus};
use serde::Deserialize;

use super::lifecycle_error;
use crate::coordinator::NewClaim;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const UPDATE_FAILED: &str = "Failed to update claim status";

/// Body of PUT /api/claims/:id/status
///
/// A missing or null `status` is recorded as an empty status string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    pub status: Option<ClaimStatus>,
}

/// Build claim routes
pub fn claim_routes() -> Router<AppState> {
    Router::new()
        .route("/api/claims", get(list_claims).post(create_claim))
        .route("/api/claims/:id/status", put(update_claim_status))
}

/// GET /api/claims
pub async fn list_claims(State(state): State<AppState>) -> Json<Vec<Claim>> {
    Json(state.coordinator.list_claims().await)
}

/// POST /api/claims
///
/// Returns 201 with the created claim.
pub async fn create_claim(
    State(state): State<AppState>,
    payload: Result<Json<NewClaim>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Claim>)> {
    let Json(fields) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let claim = state
        .coordinator
        .create_claim(fields)
        .await
        .map_err(|e| lifecycle_error(e, "Failed to submit claim"))?;

    Ok((StatusCode::CREATED, Json(claim)))
}

/// PUT /api/claims/:id/status
pub async fn update_claim_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Claim>> {
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => {
            // Unknown claims are reported as such whatever the body holds
            state
                .coordinator
                .get_claim(&id)
                .await
                .map_err(|e| lifecycle_error(e, UPDATE_FAILED))?;
            return Err(ApiError::BadRequest(rejection.body_text()));
        }
    };
    let status = update
        .status
        .unwrap_or_else(|| ClaimStatus::Other(String::new()));

    state
        .coordinator
        .set_claim_status(&id, status)
        .await
        .map(Json)
        .map_err(|e| lifecycle_error(e, UPDATE_FAILED))
}
