//! Token Gate - token authentication gateway
//!
//! Fronts a JSON API with two bearer-style token schemes: a static
//! shared-secret scheme for service-to-service clients and a delegated
//! scheme validated against a remote authorization service.

use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod error;
mod logging;

use crate::api::build_router;
use crate::auth::{
    AuthSchemes, Authenticator, SecureTokenAuthenticator, UserTokenAuthenticator,
};
use crate::config::Config;
use crate::error::GateError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Token Gate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        GateError::Config(e.to_string())
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        secure_scheme = %config.auth.secure_token.scheme,
        user_scheme = %config.auth.user_token.scheme,
        "Configuration loaded"
    );

    if config.auth.secure_token.secret.is_empty() {
        tracing::warn!("Secure token secret is empty - the static scheme will reject all tokens");
    }
    if config.auth.user_token.authorization_url.is_empty() {
        tracing::warn!(
            "Authorization URL is not set - the user token scheme will fail as misconfigured"
        );
    }

    // Build the token schemes in consultation order
    let secure_token = SecureTokenAuthenticator::new(config.auth.secure_token.clone());
    let user_token = UserTokenAuthenticator::new(config.auth.user_token.clone());
    let schemes: Vec<Box<dyn Authenticator>> = vec![Box::new(secure_token), Box::new(user_token)];

    // Build router
    let app = build_router(AuthSchemes::new(schemes));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
