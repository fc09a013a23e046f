//! HTTP request handlers.

use axum::{Extension, Json};

use crate::api::types::{HealthResponse, UserInfo};
use crate::auth::Identity;
use crate::error::{GateError, GateResult};

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Return the claims of the authenticated caller.
///
/// GET /v1/auth/me
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Authenticated caller", body = UserInfo),
        (status = 401, description = "Not authenticated")
    ),
    security(("secure_token" = []), ("user_token" = [])),
    tag = "auth"
)]
pub async fn get_current_user(
    identity: Option<Extension<Identity>>,
) -> GateResult<Json<UserInfo>> {
    let Extension(identity) =
        identity.ok_or_else(|| GateError::Unauthorized("Authentication required".to_string()))?;

    Ok(Json(identity.into()))
}
