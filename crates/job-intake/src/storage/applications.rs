use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::workflows::job_applications::{
    ApplicationId, ApplicationStore, JobApplication, JobCategory, NewJobApplication, Page,
    RepositoryError, Technology,
};

#[derive(Debug, Clone)]
pub struct SqliteApplicationStore {
    pool: SqlitePool,
}

impl SqliteApplicationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: i64,
    name: String,
    email: String,
    #[sqlx(rename = "type")]
    category: String,
    technology: String,
    message: String,
    submitted: i64,
}

impl TryFrom<ApplicationRow> for JobApplication {
    type Error = RepositoryError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let category = JobCategory::parse(&row.category).ok_or_else(|| RepositoryError::Corrupt {
            id: row.id,
            detail: format!("unknown type {:?}", row.category),
        })?;
        let technology =
            Technology::parse(&row.technology).ok_or_else(|| RepositoryError::Corrupt {
                id: row.id,
                detail: format!("unknown technology {:?}", row.technology),
            })?;

        Ok(JobApplication {
            id: ApplicationId(row.id),
            name: row.name,
            email: row.email,
            category,
            technology,
            message: row.message,
            submitted: row.submitted,
        })
    }
}

#[async_trait]
impl ApplicationStore for SqliteApplicationStore {
    async fn insert(
        &self,
        application: NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO job_applications (name, email, "type", technology, message, submitted)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING id"#,
        )
        .bind(&application.name)
        .bind(&application.email)
        .bind(application.category.as_str())
        .bind(application.technology.as_str())
        .bind(&application.message)
        .bind(application.submitted)
        .fetch_one(&self.pool)
        .await?;

        Ok(JobApplication::from_new(ApplicationId(id), application))
    }

    async fn list_recent(&self, page: Page) -> Result<Vec<JobApplication>, RepositoryError> {
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"SELECT id, name, email, "type", technology, message, submitted
               FROM job_applications
               ORDER BY id DESC
               LIMIT ? OFFSET ?"#,
        )
        .bind(i64::from(page.size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JobApplication::try_from).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect_in_memory;

    fn application(name: &str, submitted: i64) -> NewJobApplication {
        NewJobApplication {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            category: JobCategory::Backend,
            technology: Technology::Java,
            message: "line1\nline2".to_string(),
            submitted,
        }
    }

    async fn store() -> SqliteApplicationStore {
        SqliteApplicationStore::new(connect_in_memory().await.expect("database opens"))
    }

    #[tokio::test]
    async fn inserted_rows_read_back_unchanged() {
        let store = store().await;

        let stored = store
            .insert(application("A", 1_700_000_000))
            .await
            .expect("insert");
        let listed = store.list_recent(Page::new(0)).await.expect("list");

        assert_eq!(listed, vec![stored.clone()]);
        assert_eq!(stored.id, ApplicationId(1));
        assert_eq!(stored.message, "line1\nline2");
        assert_eq!(stored.email, "a@example.com");
    }

    #[tokio::test]
    async fn ids_increase_and_pages_are_newest_first() {
        let store = store().await;
        for index in 0..7 {
            store
                .insert(application(&format!("N{index}"), index))
                .await
                .expect("insert");
        }

        let first: Vec<i64> = store
            .list_recent(Page::new(0))
            .await
            .expect("page 0")
            .iter()
            .map(|row| row.id.0)
            .collect();
        let second: Vec<i64> = store
            .list_recent(Page::new(1))
            .await
            .expect("page 1")
            .iter()
            .map(|row| row.id.0)
            .collect();

        assert_eq!(first, vec![7, 6, 5, 4, 3]);
        assert_eq!(second, vec![2, 1]);
        assert!(store
            .list_recent(Page::new(2))
            .await
            .expect("page 2")
            .is_empty());
        assert_eq!(store.count().await.expect("count"), 7);
    }

    #[tokio::test]
    async fn unknown_enumerations_are_reported_as_corrupt() {
        let store = store().await;
        sqlx::query(
            r#"INSERT INTO job_applications (name, email, "type", technology, message, submitted)
               VALUES ('X', 'x@example.com', 'design', 'figma', 'm', 0)"#,
        )
        .execute(&store.pool)
        .await
        .expect("raw insert");

        match store.list_recent(Page::new(0)).await {
            Err(RepositoryError::Corrupt { id, .. }) => assert_eq!(id, 1),
            other => panic!("expected corrupt row, got {other:?}"),
        }
    }
}
