//! The `Task` entity and its repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::{StorageError, StorageResult};

/// A user-submitted task.
///
/// The slug uniquely identifies a task and is the only key the detail
/// page uses for lookup. `image` holds a media-root-relative path when
/// an upload was attached at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for a task about to be inserted.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
}

pub(crate) async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            title      TEXT NOT NULL,
            text       TEXT NOT NULL,
            slug       TEXT NOT NULL UNIQUE,
            image      TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed")
    )
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a task and return the stored row.
    ///
    /// A collision on the unique slug index maps to
    /// [`StorageError::DuplicateSlug`] so callers can surface it as a
    /// form error rather than a server failure.
    pub async fn create(&self, task: &NewTask) -> StorageResult<Task> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO tasks (title, text, slug, image, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.title)
        .bind(&task.text)
        .bind(&task.slug)
        .bind(&task.image)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            if is_unique_violation(&e) {
                return Err(StorageError::DuplicateSlug(task.slug.clone()));
            }
            return Err(e.into());
        }

        Ok(sqlx::query_as::<_, Task>(
            "SELECT id, title, text, slug, image, created_at \
             FROM tasks WHERE slug = ?",
        )
        .bind(&task.slug)
        .fetch_one(&self.pool)
        .await?)
    }

    /// List all tasks, newest first.
    pub async fn list_all(&self) -> StorageResult<Vec<Task>> {
        Ok(sqlx::query_as::<_, Task>(
            "SELECT id, title, text, slug, image, created_at \
             FROM tasks \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Look a task up by its slug.
    pub async fn find_by_slug(&self, slug: &str) -> StorageResult<Option<Task>> {
        Ok(sqlx::query_as::<_, Task>(
            "SELECT id, title, text, slug, image, created_at \
             FROM tasks WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Check whether a slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> StorageResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM tasks WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatabasePool;

    async fn test_repo() -> TaskRepository {
        let db = DatabasePool::new_in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        TaskRepository::new(db.pool().clone())
    }

    fn sample_task(slug: &str) -> NewTask {
        NewTask {
            title: "Launch checklist".to_string(),
            text: "Write down everything left before launch".to_string(),
            slug: slug.to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn create_returns_stored_row() {
        let repo = test_repo().await;
        let task = repo.create(&sample_task("launch-checklist")).await.unwrap();

        assert!(task.id > 0);
        assert_eq!(task.title, "Launch checklist");
        assert_eq!(task.slug, "launch-checklist");
        assert!(task.image.is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_slug() {
        let repo = test_repo().await;
        repo.create(&sample_task("taken")).await.unwrap();

        let err = repo.create(&sample_task("taken")).await.unwrap_err();
        assert!(
            matches!(err, StorageError::DuplicateSlug(ref slug) if slug == "taken"),
            "expected DuplicateSlug, got {err:?}"
        );

        // The original row must be untouched.
        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn list_all_returns_newest_first() {
        let repo = test_repo().await;
        repo.create(&sample_task("first")).await.unwrap();
        repo.create(&sample_task("second")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].slug, "second");
        assert_eq!(all[1].slug, "first");
    }

    #[tokio::test]
    async fn find_by_slug_matches_exactly() {
        let repo = test_repo().await;
        repo.create(&sample_task("test-slug")).await.unwrap();

        let found = repo.find_by_slug("test-slug").await.unwrap().unwrap();
        assert_eq!(found.slug, "test-slug");
        assert_eq!(found.title, "Launch checklist");

        let missing = repo.find_by_slug("no-such-slug").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn slug_exists_reflects_inserts() {
        let repo = test_repo().await;
        assert!(!repo.slug_exists("test-slug").await.unwrap());

        repo.create(&sample_task("test-slug")).await.unwrap();
        assert!(repo.slug_exists("test-slug").await.unwrap());
    }

    #[tokio::test]
    async fn image_path_round_trips() {
        let repo = test_repo().await;
        let mut task = sample_task("with-image");
        task.image = Some("tasks/with-image-abc123.png".to_string());

        let stored = repo.create(&task).await.unwrap();
        assert_eq!(stored.image.as_deref(), Some("tasks/with-image-abc123.png"));
    }
}
