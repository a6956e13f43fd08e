//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    /// Credentials or token did not authenticate. Carries no detail about
    /// which check failed.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A freshly generated token hash is already taken. Handled internally
    /// by the issuer; never reaches the HTTP caller.
    #[error("token collision")]
    TokenCollision,

    /// Storage/database error
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
