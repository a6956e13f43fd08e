use async_trait::async_trait;

use super::ApiKey;
use crate::domain::DomainResult;

#[async_trait]
pub trait ApiKeyRepositoryInterface: Send + Sync {
    /// Insert a new key. Fails with `DomainError::TokenCollision` when the
    /// token hash is already taken.
    async fn insert(&self, key: ApiKey) -> DomainResult<ApiKey>;

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<ApiKey>>;

    /// All keys belonging to a user, oldest first.
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<ApiKey>>;
}
