//! Database access: entities, migrations and repository implementations

pub mod entities;
pub mod migrator;
pub mod repositories;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open a connection pool to the given database URL.
pub async fn init_database(url: &str) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", url);

    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connected");
    Ok(db)
}
