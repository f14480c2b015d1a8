/// Comment model and database operations
///
/// Comments are owned by a task and ordered chronologically by their
/// creation timestamp. They are immutable once written; the only mutation
/// is deletion, which happens when their task is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID (UUID v4)
    pub id: Uuid,

    /// Comment body
    pub content: String,

    /// The comment's author
    pub user_id: Uuid,

    /// The owning task
    pub task_id: Uuid,

    /// When the comment was created (chronological ordering key)
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    /// Comment body
    pub content: String,

    /// Author
    pub user_id: Uuid,

    /// Owning task
    pub task_id: Uuid,
}

impl Comment {
    /// Creates a new comment
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateComment,
    ) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, user_id, task_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, user_id, task_id, created_at
            "#,
        )
        .bind(data.content)
        .bind(data.user_id)
        .bind(data.task_id)
        .fetch_one(db)
        .await?;

        Ok(comment)
    }

    /// Lists a task's comments in chronological order
    pub async fn find_by_task(
        db: impl PgExecutor<'_>,
        task_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, user_id, task_id, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(db)
        .await?;

        Ok(comments)
    }

    /// Deletes all comments of a task, returning how many were removed
    pub async fn delete_by_task(
        db: impl PgExecutor<'_>,
        task_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE task_id = $1")
            .bind(task_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}
