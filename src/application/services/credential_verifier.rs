//! Credential verification for Basic authentication

use std::sync::Arc;

use crate::auth::basic::BasicCredentials;
use crate::auth::password::verify_password;
use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};

/// Verifies email/password pairs against the user store.
///
/// Malformed payloads, unknown emails and wrong passwords all collapse
/// into `DomainError::Unauthenticated`; callers cannot tell which part
/// was wrong. Verification is read-only.
pub struct CredentialVerifier {
    users: Arc<dyn UserRepositoryInterface>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserRepositoryInterface>) -> Self {
        Self { users }
    }

    /// Verify the base64 payload of a `Basic` authorization header.
    pub async fn verify(&self, payload: &str) -> DomainResult<User> {
        let Some(credentials) = BasicCredentials::decode(payload) else {
            return Err(DomainError::Unauthenticated);
        };

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            return Err(DomainError::Unauthenticated);
        };

        let password_valid =
            verify_password(&credentials.password, &user.password_hash).unwrap_or(false);
        if !password_valid {
            return Err(DomainError::Unauthenticated);
        }

        Ok(user)
    }
}
