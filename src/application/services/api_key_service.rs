//! API key issuance and Bearer-token authentication

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::auth::token::{generate_token, hash_token};
use crate::domain::{
    ApiKey, ApiKeyRepositoryInterface, DomainError, DomainResult, IssuedApiKey, User,
    UserRepositoryInterface,
};

/// Attempts at generating a non-colliding token before giving up
const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Issues API keys and authenticates Bearer tokens.
pub struct ApiKeyService {
    users: Arc<dyn UserRepositoryInterface>,
    api_keys: Arc<dyn ApiKeyRepositoryInterface>,
}

impl ApiKeyService {
    pub fn new(
        users: Arc<dyn UserRepositoryInterface>,
        api_keys: Arc<dyn ApiKeyRepositoryInterface>,
    ) -> Self {
        Self { users, api_keys }
    }

    /// Authenticate a Bearer token, returning the owning user and the key.
    ///
    /// Read-only: no last-used bookkeeping happens here.
    pub async fn authenticate(&self, token: &str) -> DomainResult<(User, ApiKey)> {
        if token.is_empty() {
            return Err(DomainError::Unauthenticated);
        }

        let token_hash = hash_token(token);
        let Some(key) = self.api_keys.find_by_token_hash(&token_hash).await? else {
            return Err(DomainError::Unauthenticated);
        };

        let Some(user) = self.users.find_by_id(&key.user_id).await? else {
            // Owner row is gone; the key is dead.
            return Err(DomainError::Unauthenticated);
        };

        Ok((user, key))
    }

    /// Issue a new key for a verified user.
    ///
    /// The plaintext token is returned only after the row is durably
    /// inserted. A unique-constraint collision on the token hash regenerates
    /// the token; any other storage failure propagates without a retry.
    pub async fn issue(&self, user_id: &str) -> DomainResult<IssuedApiKey> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let generated = generate_token();

            let key = ApiKey {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                token_hash: generated.token_hash,
                prefix: generated.prefix,
                created_at: Utc::now(),
            };

            match self.api_keys.insert(key).await {
                Ok(stored) => {
                    metrics::counter!("api_keys_issued_total").increment(1);

                    return Ok(IssuedApiKey {
                        token: generated.token,
                        api_key: stored,
                    });
                }
                Err(DomainError::TokenCollision) => {
                    warn!(attempt, "generated token collided, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Storage(
            "token generation kept colliding".to_string(),
        ))
    }

    /// All keys belonging to a user, oldest first.
    pub async fn list(&self, user_id: &str) -> DomainResult<Vec<ApiKey>> {
        self.api_keys.list_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::CreateUserDto;

    struct NoUsers;

    #[async_trait]
    impl UserRepositoryInterface for NoUsers {
        async fn create_user(&self, _dto: CreateUserDto) -> DomainResult<User> {
            unimplemented!("not used by these tests")
        }

        async fn find_by_email(&self, _email: &str) -> DomainResult<Option<User>> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: &str) -> DomainResult<Option<User>> {
            Ok(None)
        }

        async fn count(&self) -> DomainResult<u64> {
            Ok(0)
        }
    }

    /// Key store that reports a forced number of token collisions before
    /// accepting inserts.
    struct CollidingStore {
        remaining_collisions: AtomicUsize,
    }

    impl CollidingStore {
        fn new(collisions: usize) -> Self {
            Self {
                remaining_collisions: AtomicUsize::new(collisions),
            }
        }
    }

    #[async_trait]
    impl ApiKeyRepositoryInterface for CollidingStore {
        async fn insert(&self, key: ApiKey) -> DomainResult<ApiKey> {
            let remaining = self.remaining_collisions.load(Ordering::SeqCst);
            if remaining > 0 {
                self.remaining_collisions.store(remaining - 1, Ordering::SeqCst);
                return Err(DomainError::TokenCollision);
            }

            Ok(key)
        }

        async fn find_by_token_hash(&self, _token_hash: &str) -> DomainResult<Option<ApiKey>> {
            Ok(None)
        }

        async fn list_for_user(&self, _user_id: &str) -> DomainResult<Vec<ApiKey>> {
            Ok(Vec::new())
        }
    }

    fn service(collisions: usize) -> ApiKeyService {
        ApiKeyService::new(Arc::new(NoUsers), Arc::new(CollidingStore::new(collisions)))
    }

    #[tokio::test]
    async fn issue_retries_generation_on_collision() {
        let issued = service(1).issue("user-1").await.unwrap();

        assert!(issued.token.starts_with("ak_"));
        assert_eq!(issued.api_key.user_id, "user-1");
        assert_eq!(issued.api_key.token_hash, hash_token(&issued.token));
    }

    #[tokio::test]
    async fn issue_gives_up_after_repeated_collisions() {
        let result = service(100).issue("user-1").await;

        assert!(matches!(result, Err(DomainError::Storage(_))));
    }

    #[tokio::test]
    async fn authenticate_rejects_empty_and_unknown_tokens() {
        let service = service(0);

        assert!(matches!(
            service.authenticate("").await,
            Err(DomainError::Unauthenticated)
        ));
        assert!(matches!(
            service.authenticate("ak_unknown").await,
            Err(DomainError::Unauthenticated)
        ));
    }
}
