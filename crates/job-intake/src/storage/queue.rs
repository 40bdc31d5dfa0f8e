use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::workflows::notifications::{
    ClaimedItem, NotificationQueue, QueueError, QueuedNotification, QUEUE_NAME,
};

/// Named queue stored in the shared `queue` table.
#[derive(Debug, Clone)]
pub struct SqliteNotificationQueue {
    pool: SqlitePool,
    name: String,
}

impl SqliteNotificationQueue {
    pub fn new(pool: SqlitePool) -> Self {
        Self::named(pool, QUEUE_NAME)
    }

    pub fn named(pool: SqlitePool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }
}

#[derive(Debug, FromRow)]
struct QueueRow {
    item_id: i64,
    data: String,
    created: i64,
}

#[async_trait]
impl NotificationQueue for SqliteNotificationQueue {
    async fn enqueue(
        &self,
        notification: QueuedNotification,
        created: i64,
    ) -> Result<(), QueueError> {
        let data = serde_json::to_string(&notification)
            .map_err(|err| QueueError::Unavailable(err.to_string()))?;
        sqlx::query("INSERT INTO queue (name, data, created) VALUES (?, ?, ?)")
            .bind(&self.name)
            .bind(data)
            .bind(created)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn claim(&self, limit: usize) -> Result<Vec<ClaimedItem>, QueueError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = sqlx::query_as::<_, QueueRow>(
            "DELETE FROM queue
             WHERE item_id IN (
                 SELECT item_id FROM queue WHERE name = ? ORDER BY item_id LIMIT ?
             )
             RETURNING item_id, data, created",
        )
        .bind(&self.name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        // RETURNING gives no ordering guarantee.
        rows.sort_by_key(|row| row.item_id);
        Ok(rows
            .into_iter()
            .map(|row| ClaimedItem {
                item_id: row.item_id,
                created: row.created,
                data: row.data,
            })
            .collect())
    }

    async fn len(&self) -> Result<u64, QueueError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queue WHERE name = ?")
            .bind(&self.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
