//! Application layer - business logic and use cases

pub mod services;

pub use services::{ApiKeyService, CredentialVerifier};
