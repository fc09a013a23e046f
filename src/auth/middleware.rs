//! Authentication middleware for axum.
//!
//! Consults the registered token schemes in order; the first non-skipped
//! outcome wins. Unauthorized responses advertise every registered scheme
//! through `WWW-Authenticate` challenge headers.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::scheme::{AuthOutcome, Authenticator, FailureKind};

/// Error response body for authentication failures.
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Ordered list of token schemes consulted per request.
#[derive(Clone)]
pub struct AuthSchemes {
    schemes: Arc<Vec<Box<dyn Authenticator>>>,
}

impl AuthSchemes {
    pub fn new(schemes: Vec<Box<dyn Authenticator>>) -> Self {
        Self {
            schemes: Arc::new(schemes),
        }
    }

    /// Run the schemes in registration order; the first non-skipped outcome
    /// wins. When every scheme skips, the combined outcome is `Skipped`.
    pub async fn authenticate(&self, authorization: Option<&str>) -> AuthOutcome {
        for scheme in self.schemes.iter() {
            match scheme.authenticate(authorization).await {
                AuthOutcome::Skipped => continue,
                AuthOutcome::Success(identity) => {
                    tracing::debug!(
                        scheme = %scheme.scheme(),
                        subject = %identity.subject,
                        "Authentication succeeded"
                    );
                    return AuthOutcome::Success(identity);
                }
                AuthOutcome::Failure(failure) => {
                    match failure.kind {
                        FailureKind::Misconfigured => tracing::error!(
                            scheme = %scheme.scheme(),
                            reason = %failure.reason,
                            "Authentication scheme misconfigured"
                        ),
                        FailureKind::InvalidCredentials => tracing::warn!(
                            scheme = %scheme.scheme(),
                            reason = %failure.reason,
                            "Authentication failed"
                        ),
                    }
                    return AuthOutcome::Failure(failure);
                }
            }
        }

        AuthOutcome::Skipped
    }

    /// Build the unauthorized response for a non-success outcome.
    ///
    /// The guard is default-deny: even when every scheme skipped, the request
    /// stops here with a 401. The per-scheme challenge only forces the status
    /// for attempts that were not skipped.
    fn unauthorized(&self, outcome: &AuthOutcome) -> Response {
        let skipped = outcome.is_skipped();
        let (error, code) = match outcome {
            AuthOutcome::Failure(failure) => (
                failure.reason.clone(),
                match failure.kind {
                    FailureKind::InvalidCredentials => "INVALID_TOKEN",
                    FailureKind::Misconfigured => "AUTH_MISCONFIGURED",
                },
            ),
            _ => ("Authentication required".to_string(), "UNAUTHENTICATED"),
        };

        let mut response = AuthError {
            error,
            code: code.to_string(),
        }
        .into_response();

        for scheme in self.schemes.iter() {
            challenge(scheme.as_ref(), skipped, &mut response);
        }

        response
    }
}

/// Apply one scheme's challenge to an unauthorized response.
///
/// The status is forced to 401 only when the authentication attempt was not
/// a skip; the challenge header is appended unconditionally so the scheme is
/// still advertised even when a later handler decides the final status.
pub fn challenge(scheme: &dyn Authenticator, skipped: bool, response: &mut Response) {
    if !skipped {
        *response.status_mut() = StatusCode::UNAUTHORIZED;
    }

    if let Ok(value) = HeaderValue::from_str(&scheme.challenge_value()) {
        response.headers_mut().append(WWW_AUTHENTICATE, value);
    }
}

/// Require token authentication on a route.
///
/// On success the authenticated `Identity` is inserted into the request
/// extensions for handlers to read.
pub async fn require_token_auth(
    State(schemes): State<AuthSchemes>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    match schemes.authenticate(authorization.as_deref()).await {
        AuthOutcome::Success(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        outcome => schemes.unauthorized(&outcome),
    }
}
