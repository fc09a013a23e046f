//! Static shared-secret authentication for service-to-service clients.

use async_trait::async_trait;

use crate::auth::scheme::{extract_credential, AuthFailure, AuthOutcome, Authenticator, Identity};

/// Subject id carried by the fixed system identity.
const SYSTEM_SUBJECT: &str = "SystemId";
/// Display name carried by the fixed system identity.
const SYSTEM_NAME: &str = "System";

/// Secure token scheme configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SecureTokenOptions {
    /// Scheme name used as the `Authorization` prefix and in challenges.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Realm advertised in the challenge header.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// The shared secret clients must present.
    #[serde(default)]
    pub secret: String,
}

fn default_scheme() -> String {
    "SecureToken".to_string()
}

fn default_realm() -> String {
    "token-gate".to_string()
}

impl Default for SecureTokenOptions {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            realm: default_realm(),
            secret: String::new(),
        }
    }
}

/// Validates the static shared-secret scheme.
///
/// A matching token always yields the same synthetic system identity; there
/// is no per-client state and no role claim.
#[derive(Clone)]
pub struct SecureTokenAuthenticator {
    options: SecureTokenOptions,
}

impl SecureTokenAuthenticator {
    pub fn new(options: SecureTokenOptions) -> Self {
        Self { options }
    }

    /// Compare a presented token against the configured secret.
    ///
    /// Ordinal case-insensitive: no locale-dependent folding.
    fn validate(&self, token: &str) -> bool {
        self.options.secret.eq_ignore_ascii_case(token)
    }
}

#[async_trait]
impl Authenticator for SecureTokenAuthenticator {
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

        if self.validate(&token) {
            return AuthOutcome::Success(Identity {
                subject: SYSTEM_SUBJECT.to_string(),
                display_name: SYSTEM_NAME.to_string(),
                role: None,
                scheme: self.options.scheme.clone(),
            });
        }

        AuthOutcome::Failure(AuthFailure::invalid(format!(
            "{} is invalid.",
            self.options.scheme
        )))
    }
}
