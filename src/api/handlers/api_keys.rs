//! API key endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::application::services::ApiKeyService;
use crate::auth::middleware::AuthenticatedUser;
use crate::domain::ApiKey;

/// State for the API key handlers
#[derive(Clone)]
pub struct ApiKeyHandlerState {
    pub api_keys: Arc<ApiKeyService>,
}

/// A single key as rendered to clients. Never carries the token.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyResponse {
    pub id: String,
    pub prefix: String,
    pub created_at: String,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            prefix: key.prefix,
            created_at: key.created_at.to_rfc3339(),
        }
    }
}

/// Created key response (includes the plaintext token - only shown once!)
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedApiKeyResponse {
    /// The full token - SAVE THIS! It won't be shown again
    pub token: String,
    /// Key details
    pub api_key: ApiKeyResponse,
}

/// Create a new API key
///
/// Requires Basic credentials. Each call mints a distinct key; the
/// endpoint is not idempotent.
#[utoipa::path(
    post,
    path = "/api-keys",
    tag = "API Keys",
    security(
        ("basic_auth" = [])
    ),
    responses(
        (status = 201, description = "API key created", body = ApiResponse<CreatedApiKeyResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_api_key(
    State(state): State<ApiKeyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<
    (
        StatusCode,
        [(HeaderName, &'static str); 1],
        Json<ApiResponse<CreatedApiKeyResponse>>,
    ),
    (StatusCode, Json<ApiResponse<CreatedApiKeyResponse>>),
> {
    let issued = state.api_keys.issue(&user.user_id).await.map_err(|e| {
        tracing::error!("failed to issue api key: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to issue API key")),
        )
    })?;

    let response = CreatedApiKeyResponse {
        token: issued.token,
        api_key: issued.api_key.into(),
    };

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        Json(ApiResponse::success(response)),
    ))
}

/// List the caller's API keys
///
/// Requires a Bearer token. Confirms authorization only: the response is
/// 204 with no body, so no key material is disclosed here.
#[utoipa::path(
    get,
    path = "/api-keys",
    tag = "API Keys",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Authorized, no content"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_api_keys(
    State(state): State<ApiKeyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<StatusCode, (StatusCode, Json<ApiResponse<()>>)> {
    let keys = state.api_keys.list(&user.user_id).await.map_err(|e| {
        tracing::error!("failed to list api keys: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to list API keys")),
        )
    })?;

    tracing::debug!(count = keys.len(), user_id = %user.user_id, "listed api keys");
    Ok(StatusCode::NO_CONTENT)
}
