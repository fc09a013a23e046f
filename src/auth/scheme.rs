//! Shared authentication contract: credential extraction, outcome types,
//! and the `Authenticator` trait implemented by each token scheme.

use async_trait::async_trait;
use serde::Serialize;

/// The authenticated subject produced by a successful validation.
///
/// Constructed fresh per request and discarded when the request completes;
/// nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    /// Subject identifier. Never empty on a `Success` outcome.
    pub subject: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Role claim; absent for the static scheme's system identity.
    pub role: Option<String>,
    /// Name of the scheme that authenticated this identity.
    pub scheme: String,
}

/// Why an authentication attempt failed.
///
/// `Misconfigured` means the server itself cannot validate this scheme
/// (missing authorization endpoint); operators need to tell that apart
/// from a plain bad credential in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidCredentials,
    Misconfigured,
}

/// A failed authentication attempt with a human-readable reason.
#[derive(Debug, Clone)]
pub struct AuthFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl AuthFailure {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::InvalidCredentials,
            reason: reason.into(),
        }
    }

    pub fn misconfigured(reason: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Misconfigured,
            reason: reason.into(),
        }
    }
}

/// Outcome of one authentication attempt.
///
/// `Skipped` means no credential for this scheme was presented; it is not an
/// error and must never produce a 401 by itself. The tagged form exists so
/// "no attempt made" and "attempt failed" can never be confused.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// No credential for this scheme; other schemes may still apply.
    Skipped,
    /// Credential validated; carries the authenticated identity.
    Success(Identity),
    /// Credential present but rejected, or the scheme is misconfigured.
    Failure(AuthFailure),
}

impl AuthOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, AuthOutcome::Skipped)
    }
}

/// One token authentication scheme.
///
/// Implementations are stateless across requests and may be consulted
/// concurrently; the delegated scheme suspends on its outbound call without
/// blocking other requests.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Scheme name, used as the `Authorization` header prefix and in the
    /// `WWW-Authenticate` challenge.
    fn scheme(&self) -> &str;

    /// Realm advertised in the challenge header.
    fn realm(&self) -> &str;

    /// Attempt to authenticate from the raw `Authorization` header value.
    async fn authenticate(&self, authorization: Option<&str>) -> AuthOutcome;

    /// Challenge value advertised on unauthorized responses.
    ///
    /// The realm is substituted verbatim, quoted but not escaped.
    fn challenge_value(&self) -> String {
        format!("{} realm=\"{}\"", self.scheme(), self.realm())
    }
}

/// Extract the credential from an `Authorization` header value.
///
/// The header must start with `"<scheme> "` (case-insensitive, exactly one
/// space); the remainder is trimmed. A missing, empty, or non-matching header
/// yields `None` - a valid, unremarkable outcome, not an error.
pub fn extract_credential(authorization: Option<&str>, scheme: &str) -> Option<String> {
    let header = authorization?;
    if header.trim().is_empty() {
        return None;
    }

    let head = header.get(..scheme.len())?;
    if !head.eq_ignore_ascii_case(scheme) {
        return None;
    }

    let rest = header[scheme.len()..].strip_prefix(' ')?;
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_blank_header() {
        assert_eq!(extract_credential(None, "SecureToken"), None);
        assert_eq!(extract_credential(Some(""), "SecureToken"), None);
        assert_eq!(extract_credential(Some("   "), "SecureToken"), None);
    }

    #[test]
    fn test_wrong_scheme_prefix() {
        assert_eq!(extract_credential(Some("Bearer abc123"), "SecureToken"), None);
        // No separating space
        assert_eq!(extract_credential(Some("SecureTokenabc123"), "SecureToken"), None);
        // Scheme name alone
        assert_eq!(extract_credential(Some("SecureToken"), "SecureToken"), None);
    }

    #[test]
    fn test_empty_token_after_prefix() {
        assert_eq!(extract_credential(Some("SecureToken "), "SecureToken"), None);
        assert_eq!(extract_credential(Some("SecureToken    "), "SecureToken"), None);
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        assert_eq!(
            extract_credential(Some("securetoken abc123"), "SecureToken"),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_credential(Some("SECURETOKEN abc123"), "SecureToken"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_token_is_trimmed() {
        assert_eq!(
            extract_credential(Some("UserToken   abc123  "), "UserToken"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_multibyte_header_does_not_panic() {
        assert_eq!(extract_credential(Some("Sécu très"), "SecureToken"), None);
    }

    #[test]
    fn test_challenge_value_format() {
        struct Fake;

        #[async_trait]
        impl Authenticator for Fake {
            fn scheme(&self) -> &str {
                "SecureToken"
            }
            fn realm(&self) -> &str {
                "token-gate"
            }
            async fn authenticate(&self, _authorization: Option<&str>) -> AuthOutcome {
                AuthOutcome::Skipped
            }
        }

        assert_eq!(Fake.challenge_value(), "SecureToken realm=\"token-gate\"");
    }
}
