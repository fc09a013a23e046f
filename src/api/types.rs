//! API request and response types.

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status, always "ok" when reachable.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Claims of the authenticated caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// Subject identifier.
    pub subject: String,
    /// Display name.
    pub display_name: String,
    /// Role claim, absent for the system identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Scheme that authenticated the request.
    pub scheme: String,
}

impl From<crate::auth::Identity> for UserInfo {
    fn from(identity: crate::auth::Identity) -> Self {
        Self {
            subject: identity.subject,
            display_name: identity.display_name,
            role: identity.role,
            scheme: identity.scheme,
        }
    }
}
