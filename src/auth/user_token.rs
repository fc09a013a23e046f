//! Delegated user-token authentication.
//!
//! Forwards the presented token to a remote authorization endpoint and maps
//! its answer to an identity. Only a 200 response counts as success; every
//! other outcome (4xx, 5xx, network error, malformed body) is reported as
//! invalid credentials - the conflation is deliberate, finer detail goes to
//! the logs only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::auth::scheme::{extract_credential, AuthFailure, AuthOutcome, Authenticator, Identity};

/// Header carrying the credential on the outbound validation call.
const USER_TOKEN_HEADER: &str = "UserToken";

/// User token scheme configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserTokenOptions {
    /// Scheme name used as the `Authorization` prefix and in challenges.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Realm advertised in the challenge header.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Base URL of the authorization service; the validator calls
    /// `GET {authorization_url}/accessToken`.
    #[serde(default)]
    pub authorization_url: String,
    /// Timeout for the outbound validation call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scheme() -> String {
    "UserToken".to_string()
}

fn default_realm() -> String {
    "token-gate".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for UserTokenOptions {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            realm: default_realm(),
            authorization_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User record returned by the authorization service on a 200 response.
#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    name: String,
    role: String,
}

/// Validates tokens against the remote authorization service.
///
/// Owns a single shared HTTP client; every authentication attempt performs
/// one fresh outbound call, with no retries and no response caching.
#[derive(Clone)]
pub struct UserTokenAuthenticator {
    options: UserTokenOptions,
    client: Client,
}

impl UserTokenAuthenticator {
    pub fn new(options: UserTokenOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { options, client }
    }

    /// Look up the user behind a token at the authorization service.
    ///
    /// Returns `None` for anything other than a 200 response carrying a
    /// well-formed user record with a non-empty id.
    async fn fetch_user(&self, token: &str) -> Option<RemoteUser> {
        let base = self.options.authorization_url.trim_end_matches('/');
        let url = format!("{base}/accessToken");

        let response = match self
            .client
            .get(&url)
            .header(USER_TOKEN_HEADER, token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "Authorization service unreachable");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::debug!(status = %response.status(), "Authorization service rejected token");
            return None;
        }

        match response.json::<RemoteUser>().await {
            Ok(user) if !user.id.is_empty() => Some(user),
            Ok(_) => {
                tracing::warn!("Authorization service returned a user without an id");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed response from authorization service");
                None
            }
        }
    }

    fn invalid_credentials(&self) -> AuthOutcome {
        AuthOutcome::Failure(AuthFailure::invalid(format!(
            "{} authentication failed. Credentials are invalid.",
            self.options.scheme
        )))
    }
}

#[async_trait]
impl Authenticator for UserTokenAuthenticator {
    fn scheme(&self) -> &str {
        &self.options.scheme
    }

    fn realm(&self) -> &str {
        &self.options.realm
    }

    async fn authenticate(&self, authorization: Option<&str>) -> AuthOutcome {
        let Some(token) = extract_credential(authorization, &self.options.scheme) else {
            return AuthOutcome::Skipped;
        };

        if self.options.authorization_url.trim().is_empty() {
            return AuthOutcome::Failure(AuthFailure::misconfigured(format!(
                "{} authentication failed. Authorization server was not specified.",
                self.options.scheme
            )));
        }

        match self.fetch_user(&token).await {
            Some(user) => AuthOutcome::Success(Identity {
                subject: user.id,
                display_name: user.name,
                role: Some(user.role),
                scheme: self.options.scheme.clone(),
            }),
            None => self.invalid_credentials(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::scheme::FailureKind;
    use httpmock::prelude::*;
    use httpmock::MockServer;

    fn authenticator(url: &str) -> UserTokenAuthenticator {
        UserTokenAuthenticator::new(UserTokenOptions {
            authorization_url: url.to_string(),
            timeout_secs: 2,
            ..UserTokenOptions::default()
        })
    }

    #[tokio::test]
    async fn test_valid_token_yields_user_identity() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/accessToken")
                .header("UserToken", "tok-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"u1","name":"Alice","role":"admin"}"#);
        });

        let auth = authenticator(&server.base_url());
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        mock.assert();
        let AuthOutcome::Success(identity) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(identity.subject, "u1");
        assert_eq!(identity.display_name, "Alice");
        assert_eq!(identity.role.as_deref(), Some("admin"));
        assert_eq!(identity.scheme, "UserToken");
    }

    #[tokio::test]
    async fn test_rejected_token_is_invalid_credentials() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/accessToken");
            then.status(401);
        });

        let auth = authenticator(&server.base_url());
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        let AuthOutcome::Failure(failure) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
        assert_eq!(
            failure.reason,
            "UserToken authentication failed. Credentials are invalid."
        );
    }

    #[tokio::test]
    async fn test_server_error_is_invalid_credentials() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/accessToken");
            then.status(500);
        });

        let auth = authenticator(&server.base_url());
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        let AuthOutcome::Failure(failure) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_invalid_credentials() {
        // Nothing listens on this port.
        let auth = authenticator("http://127.0.0.1:1");
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        let AuthOutcome::Failure(failure) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(failure.kind, FailureKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_malformed_body_fails_closed() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/accessToken");
            then.status(200)
                .header("content-type", "application/json")
                .body("not json");
        });

        let auth = authenticator(&server.base_url());
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        assert!(matches!(outcome, AuthOutcome::Failure(_)));
    }

    #[tokio::test]
    async fn test_empty_subject_fails_closed() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/accessToken");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"","name":"Nobody","role":"user"}"#);
        });

        let auth = authenticator(&server.base_url());
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        assert!(matches!(outcome, AuthOutcome::Failure(_)));
    }

    #[tokio::test]
    async fn test_missing_authorization_url_is_misconfiguration() {
        let auth = authenticator("");
        let outcome = auth.authenticate(Some("UserToken tok-1")).await;

        let AuthOutcome::Failure(failure) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(failure.kind, FailureKind::Misconfigured);
        assert_eq!(
            failure.reason,
            "UserToken authentication failed. Authorization server was not specified."
        );
    }

    #[tokio::test]
    async fn test_missing_header_is_skipped() {
        let auth = authenticator("http://127.0.0.1:1");
        assert!(auth.authenticate(None).await.is_skipped());
        assert!(auth.authenticate(Some("Bearer tok")).await.is_skipped());
    }
}
