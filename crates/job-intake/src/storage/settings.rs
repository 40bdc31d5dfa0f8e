use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::settings::{ApiKey, SettingsError, SettingsStore, SENDGRID_API_KEY};

/// Settings kept in the `config` table; every load hits the database.
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn load_api_key(&self) -> Result<ApiKey, SettingsError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM config WHERE name = ?")
            .bind(SENDGRID_API_KEY)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value.map(ApiKey::new).unwrap_or_default())
    }

    async fn save_api_key(&self, key: ApiKey) -> Result<(), SettingsError> {
        sqlx::query(
            "INSERT INTO config (name, value) VALUES (?, ?)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        )
        .bind(SENDGRID_API_KEY)
        .bind(key.expose())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
