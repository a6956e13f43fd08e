//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::services::{ApiKeyService, CredentialVerifier};
use crate::domain::DomainError;

/// Authentication state shared by the auth layers
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<CredentialVerifier>,
    pub api_keys: Arc<ApiKeyService>,
}

/// Authenticated caller information
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub auth_method: AuthMethod,
}

/// How the caller was authenticated
#[derive(Clone, Debug)]
pub enum AuthMethod {
    /// Basic email:password credentials
    Basic,
    /// Bearer API key
    ApiKey { key_id: String },
}

/// Bearer authentication middleware - requires a known API key token
pub async fn bearer_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Get Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return unauthorized_response("bearer");
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return unauthorized_response("bearer");
    };

    match auth_state.api_keys.authenticate(token).await {
        Ok((user, key)) => {
            request.extensions_mut().insert(AuthenticatedUser {
                user_id: user.id,
                email: user.email,
                auth_method: AuthMethod::ApiKey { key_id: key.id },
            });

            next.run(request).await
        }
        Err(DomainError::Unauthenticated) => unauthorized_response("bearer"),
        Err(e) => storage_error_response(e),
    }
}

/// Basic authentication middleware - requires verified email:password
pub async fn basic_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return unauthorized_response("basic");
    };

    let Some(payload) = auth_header.strip_prefix("Basic ") else {
        return unauthorized_response("basic");
    };

    match auth_state.verifier.verify(payload).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthenticatedUser {
                user_id: user.id,
                email: user.email,
                auth_method: AuthMethod::Basic,
            });

            next.run(request).await
        }
        Err(DomainError::Unauthenticated) => unauthorized_response("basic"),
        Err(e) => storage_error_response(e),
    }
}

/// Uniform 401 response. The body never says which check failed.
fn unauthorized_response(scheme: &'static str) -> Response {
    metrics::counter!("auth_failures_total", "scheme" => scheme).increment(1);

    let body = Json(json!({
        "success": false,
        "error": "Unauthorized"
    }));

    (StatusCode::UNAUTHORIZED, body).into_response()
}

/// 500 response for storage failures during authentication
fn storage_error_response(error: DomainError) -> Response {
    tracing::error!("authentication storage failure: {}", error);

    let body = Json(json!({
        "success": false,
        "error": "Internal server error"
    }));

    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
