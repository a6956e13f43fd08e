//! # API Key Service
//!
//! Issues and authenticates API keys for programmatic access.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Credential verification and key issuance services
//! - **infrastructure**: Database entities, migrations and repositories
//! - **auth**: Basic/Bearer header handling, token generation, middleware
//! - **api**: REST API with Swagger documentation

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database helpers for easy access
pub use infrastructure::database::init_database;

// Re-export API router
pub use api::create_api_router;
