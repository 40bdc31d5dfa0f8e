//! SQLite persistence for applications, settings, and the follow-up queue.

mod applications;
mod queue;
mod settings;

use std::str::FromStr;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::DatabaseConfig;

pub use applications::SqliteApplicationStore;
pub use queue::SqliteNotificationQueue;
pub use settings::SqliteSettingsStore;
pub use sqlx::sqlite::SqlitePool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid database url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unable to apply migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Opens the configured database, creating the file when it does not exist yet.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|source| StorageError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    tracing::debug!(url = %config.url, "connected to database");
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
