//! Application services

pub mod api_key_service;
pub mod credential_verifier;

pub use api_key_service::ApiKeyService;
pub use credential_verifier::CredentialVerifier;
