//! User aggregate

pub mod repository;

use chrono::{DateTime, Utc};

pub use repository::UserRepositoryInterface;

/// A user able to hold API keys. Users are created by the bootstrap
/// seeding in `main` or by test fixtures, never through this service's
/// HTTP surface.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
}
