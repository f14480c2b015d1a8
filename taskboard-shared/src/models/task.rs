/// Task model and database operations
///
/// Tasks belong to a team and record their creator. Sub-boards and comments
/// reference the task by `task_id`; the task row holds no child id lists.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     due_time TIMESTAMPTZ,
///     document_link VARCHAR(512),
///     github_repo VARCHAR(512),
///     creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Task owned by a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due time (required at creation, nullable in storage)
    pub due_time: Option<DateTime<Utc>>,

    /// Optional link to an external document
    pub document_link: Option<String>,

    /// Optional link to a GitHub repository
    pub github_repo: Option<String>,

    /// The user who created the task (a team member at creation time)
    pub creator_id: Uuid,

    /// The owning team
    pub team_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due time
    pub due_time: Option<DateTime<Utc>>,

    /// Optional document link (already format-validated)
    pub document_link: Option<String>,

    /// Optional GitHub repository link (already format-validated)
    pub github_repo: Option<String>,

    /// Creating user
    pub creator_id: Uuid,

    /// Owning team
    pub team_id: Uuid,
}

/// Input for updating an existing task
///
/// Merge semantics: only non-None fields overwrite. Nullable columns take
/// `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (Some(None) clears it)
    pub description: Option<Option<String>>,

    /// New due time (Some(None) clears it)
    pub due_time: Option<Option<DateTime<Utc>>>,

    /// New document link (Some(None) clears it)
    pub document_link: Option<Option<String>>,

    /// New GitHub repository link (Some(None) clears it)
    pub github_repo: Option<Option<String>>,
}

/// One page of tasks plus the total matching count
#[derive(Debug, Clone, Serialize)]
pub struct TaskPage {
    /// Tasks on this page, newest first
    pub tasks: Vec<Task>,

    /// Total number of tasks matching the filter
    pub total_count: i64,

    /// 1-based page number
    pub page: i64,

    /// Page size
    pub limit: i64,
}

impl Task {
    /// Creates a new task
    pub async fn create(db: impl PgExecutor<'_>, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_time, document_link, github_repo, creator_id, team_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, due_time, document_link, github_repo,
                      creator_id, team_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_time)
        .bind(data.document_link)
        .bind(data.github_repo)
        .bind(data.creator_id)
        .bind(data.team_id)
        .fetch_one(db)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, returning None if the id does not resolve
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_time, document_link, github_repo,
                   creator_id, team_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(task)
    }

    /// Updates a task with merge semantics
    ///
    /// Only non-None fields in `data` are written; `updated_at` is bumped
    /// automatically.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.due_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_time = ${}", bind_count));
        }
        if data.document_link.is_some() {
            bind_count += 1;
            query.push_str(&format!(", document_link = ${}", bind_count));
        }
        if data.github_repo.is_some() {
            bind_count += 1;
            query.push_str(&format!(", github_repo = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, due_time, document_link, \
             github_repo, creator_id, team_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(due_time) = data.due_time {
            q = q.bind(due_time);
        }
        if let Some(document_link) = data.document_link {
            q = q.bind(document_link);
        }
        if let Some(github_repo) = data.github_repo {
            q = q.bind(github_repo);
        }

        let task = q.fetch_optional(db).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Callers that need the comment/sub-board cascade should go through
    /// `services::tasks::delete_task`, which wraps the whole cascade in a
    /// transaction.
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the task didn't exist
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks belonging to any of the given teams, newest first
    pub async fn list_by_teams(
        db: impl PgExecutor<'_>,
        team_ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_time, document_link, github_repo,
                   creator_id, team_id, created_at, updated_at
            FROM tasks
            WHERE team_id = ANY($1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(team_ids)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(tasks)
    }

    /// Counts tasks belonging to any of the given teams
    pub async fn count_by_teams(
        db: impl PgExecutor<'_>,
        team_ids: &[Uuid],
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE team_id = ANY($1)")
                .bind(team_ids)
                .fetch_one(db)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_default() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.due_time.is_none());
        assert!(update.document_link.is_none());
        assert!(update.github_repo.is_none());
    }

    #[test]
    fn test_task_page_serializes_tasks_and_count() {
        let page = TaskPage {
            tasks: vec![],
            total_count: 0,
            page: 1,
            limit: 10,
        };

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["total_count"], 0);
        assert_eq!(json["page"], 1);
        assert!(json["tasks"].as_array().unwrap().is_empty());
    }
}
