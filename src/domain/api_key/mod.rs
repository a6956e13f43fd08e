//! API key aggregate

pub mod repository;

use chrono::{DateTime, Utc};

pub use repository::ApiKeyRepositoryInterface;

/// A persisted bearer credential. Only the SHA-256 hash of the token is
/// stored; the key's owner is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKey {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub prefix: String,
    pub created_at: DateTime<Utc>,
}

/// A freshly issued key together with its plaintext token. The token
/// leaves the process exactly once, in the creation response.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub token: String,
    pub api_key: ApiKey,
}
