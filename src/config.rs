//! Configuration module for the token gateway.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::{SecureTokenOptions, UserTokenOptions};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Authentication configuration for both token schemes.
///
/// The secure-token secret and the user-token authorization URL have no
/// sensible defaults; leaving them empty makes the respective scheme reject
/// every credential (the user-token scheme reports a misconfiguration).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secure_token: SecureTokenOptions,
    pub user_token: UserTokenOptions,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKENGATE_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with TOKENGATE_ prefix
            .add_source(
                Environment::with_prefix("TOKENGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
