use async_trait::async_trait;

use super::domain::{JobApplication, NewJobApplication};

/// Rows per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Zero-based page window over the most-recent-first ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: u32,
    pub size: u32,
}

impl Page {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }
}

/// Append-only storage for submitted applications.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert(&self, application: NewJobApplication)
        -> Result<JobApplication, RepositoryError>;

    /// Records ordered by id descending, windowed by `page`.
    async fn list_recent(&self, page: Page) -> Result<Vec<JobApplication>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored row {id} is malformed: {detail}")]
    Corrupt { id: i64, detail: String },
}

impl From<sqlx::Error> for RepositoryError {
    fn from(value: sqlx::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}
