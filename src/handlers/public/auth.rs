// handlers/public/auth.rs - GET /auth/:dealership_id handler

use axum::extract::{Path, State};
use serde::Serialize;

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// GET /auth/:dealership_id - issue a bearer token acting as the given dealership
///
/// Mounted only when `security.enable_token_endpoint` is set. Unknown
/// dealerships get a 404 rather than a token that would fail on first use.
pub async fn token_get(State(state): State<AppState>, Path(dealership_id): Path<String>) -> ApiResult<TokenResponse> {
    let token = state.auth.issue_token(&dealership_id).await.map_err(|e| match e {
        AuthError::UnknownDealership(id) => ApiError::not_found(format!("dealership '{}' not found", id)),
        other => ApiError::from(other),
    })?;

    Ok(ApiResponse::success(TokenResponse { token }))
}
