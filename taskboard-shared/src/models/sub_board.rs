/// Sub-board model and database operations
///
/// Sub-boards are owned by a task. Names are unique within their task,
/// case-insensitively; a unique index on `(task_id, LOWER(name))` enforces
/// this in the store so concurrent creations cannot race past the service
/// pre-check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Sub-board attached to a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubBoard {
    /// Unique sub-board ID (UUID v4)
    pub id: Uuid,

    /// Sub-board name, unique within the owning task (case-insensitive)
    pub name: String,

    /// The owning task
    pub task_id: Uuid,

    /// Optional background URL or color
    pub background: Option<String>,

    /// When the sub-board was created
    pub created_at: DateTime<Utc>,

    /// When the sub-board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new sub-board
#[derive(Debug, Clone)]
pub struct CreateSubBoard {
    /// Sub-board name
    pub name: String,

    /// Owning task
    pub task_id: Uuid,

    /// Optional background URL or color
    pub background: Option<String>,
}

/// Input for updating an existing sub-board
#[derive(Debug, Clone, Default)]
pub struct UpdateSubBoard {
    /// New name
    pub name: Option<String>,

    /// New background (Some(None) clears it)
    pub background: Option<Option<String>>,
}

impl SubBoard {
    /// Creates a new sub-board
    ///
    /// # Errors
    ///
    /// Returns an error if the name collides with another sub-board of the
    /// same task (unique index violation) or the write fails.
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateSubBoard,
    ) -> Result<Self, sqlx::Error> {
        let sub_board = sqlx::query_as::<_, SubBoard>(
            r#"
            INSERT INTO sub_boards (name, task_id, background)
            VALUES ($1, $2, $3)
            RETURNING id, name, task_id, background, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.task_id)
        .bind(data.background)
        .fetch_one(db)
        .await?;

        Ok(sub_board)
    }

    /// Finds a sub-board by ID, returning None if the id does not resolve
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sub_board = sqlx::query_as::<_, SubBoard>(
            r#"
            SELECT id, name, task_id, background, created_at, updated_at
            FROM sub_boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(sub_board)
    }

    /// Lists a task's sub-boards in insertion order
    pub async fn find_by_task(
        db: impl PgExecutor<'_>,
        task_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sub_boards = sqlx::query_as::<_, SubBoard>(
            r#"
            SELECT id, name, task_id, background, created_at, updated_at
            FROM sub_boards
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(db)
        .await?;

        Ok(sub_boards)
    }

    /// Checks whether a name is already taken within a task
    ///
    /// The comparison is case-insensitive. Pass `exclude` when re-checking
    /// during an update so the sub-board doesn't collide with itself.
    pub async fn name_exists(
        db: impl PgExecutor<'_>,
        task_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sub_boards
                WHERE task_id = $1
                  AND LOWER(name) = LOWER($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(task_id)
        .bind(name)
        .bind(exclude)
        .fetch_one(db)
        .await?;

        Ok(exists)
    }

    /// Updates a sub-board with merge semantics
    ///
    /// # Returns
    ///
    /// The updated sub-board if found, None if it doesn't exist
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateSubBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE sub_boards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.background.is_some() {
            bind_count += 1;
            query.push_str(&format!(", background = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, task_id, background, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, SubBoard>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(background) = data.background {
            q = q.bind(background);
        }

        let sub_board = q.fetch_optional(db).await?;

        Ok(sub_board)
    }

    /// Deletes a sub-board by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if it didn't exist
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sub_boards WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all sub-boards of a task, returning how many were removed
    pub async fn delete_by_task(
        db: impl PgExecutor<'_>,
        task_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sub_boards WHERE task_id = $1")
            .bind(task_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_sub_board_default() {
        let update = UpdateSubBoard::default();
        assert!(update.name.is_none());
        assert!(update.background.is_none());
    }
}
