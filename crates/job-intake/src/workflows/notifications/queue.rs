use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Name of the queue holding post-submission follow-ups.
pub const QUEUE_NAME: &str = "job_application_mail_sender";

/// Work item created once per recorded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedNotification {
    pub email: String,
}

/// An item removed from the queue. Its payload is decoded lazily so one bad
/// row does not poison a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedItem {
    pub item_id: i64,
    pub created: i64,
    pub data: String,
}

impl ClaimedItem {
    pub fn notification(&self) -> Result<QueuedNotification, QueueError> {
        serde_json::from_str(&self.data).map_err(|err| QueueError::Malformed {
            item_id: self.item_id,
            detail: err.to_string(),
        })
    }
}

/// FIFO work queue. Claiming removes items, so each is handed out at most once.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    async fn enqueue(&self, notification: QueuedNotification, created: i64)
        -> Result<(), QueueError>;

    /// Removes and returns up to `limit` items, oldest first.
    async fn claim(&self, limit: usize) -> Result<Vec<ClaimedItem>, QueueError>;

    async fn len(&self) -> Result<u64, QueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue unavailable: {0}")]
    Unavailable(String),
    #[error("queue item {item_id} has a malformed payload: {detail}")]
    Malformed { item_id: i64, detail: String },
}

impl From<sqlx::Error> for QueueError {
    fn from(value: sqlx::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}
