//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::ApiResponse;
use crate::api::handlers::{api_keys, health};
use crate::application::services::{ApiKeyService, CredentialVerifier};
use crate::auth::middleware::{basic_auth_middleware, bearer_auth_middleware, AuthState};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("API key token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Basic)
                        .description(Some("email:password credentials"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        api_keys::list_api_keys,
        api_keys::create_api_key,
    ),
    components(
        schemas(
            ApiResponse<String>,
            api_keys::ApiKeyResponse,
            api_keys::CreatedApiKeyResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe."),
        (name = "API Keys", description = "API key issuance and listing. A key's token is shown once, at creation, and presented afterwards in the `Authorization: Bearer <token>` header. Keys are minted with Basic email:password credentials."),
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    verifier: Arc<CredentialVerifier>,
    api_key_service: Arc<ApiKeyService>,
) -> Router {
    let auth_state = AuthState {
        verifier,
        api_keys: api_key_service.clone(),
    };

    let api_key_state = api_keys::ApiKeyHandlerState {
        api_keys: api_key_service,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // GET /api-keys authenticates with a Bearer token, POST with Basic
    // credentials; each method carries its own auth layer.
    let bearer_routes = Router::new()
        .route("/", get(api_keys::list_api_keys))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            bearer_auth_middleware,
        ))
        .with_state(api_key_state.clone());

    let basic_routes = Router::new()
        .route("/", post(api_keys::create_api_key))
        .layer(middleware::from_fn_with_state(
            auth_state,
            basic_auth_middleware,
        ))
        .with_state(api_key_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // API Keys
        .nest("/api-keys", bearer_routes.merge(basic_routes))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
