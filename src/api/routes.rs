//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_token_auth, AuthSchemes};

/// Security scheme modifier for OpenAPI.
///
/// Both token schemes ride the `Authorization` header with their own prefix,
/// so they are advertised as header API keys rather than HTTP bearer auth.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "secure_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "SecureToken <secret>",
                ))),
            );
            components.add_security_scheme(
                "user_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "UserToken <token>",
                ))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health_check, handlers::get_current_user),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::api::types::UserInfo,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authenticated caller endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Token Gate API",
        version = "0.1.0",
        description = "Token authentication gateway - static shared-secret and delegated user-token schemes",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(schemes: AuthSchemes) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes behind the token schemes
    let protected_routes = Router::new()
        .route("/v1/auth/me", get(handlers::get_current_user))
        .layer(middleware::from_fn_with_state(schemes, require_token_auth));

    // Public routes (no auth required)
    let public_routes = Router::new().route("/v1/health", get(handlers::health_check));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
