/// Comment workflows
///
/// Commenting and reading comments is open to system Admins, the owning
/// team's admin, and team members; outsiders are rejected. Comments are
/// returned in chronological order.

use sqlx::PgPool;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Actor, AuthzError, TeamAction};
use crate::models::{Comment, CreateComment, Task, Team, User};

/// Adds a comment to a task
///
/// # Errors
///
/// - `Validation` for empty content
/// - `NotFound` if the author, task, or team doesn't resolve
/// - `NotAuthorized` if the caller is outside the owning team
pub async fn add_comment(
    pool: &PgPool,
    content: &str,
    task_id: Uuid,
    caller: &Actor,
) -> ServiceResult<Comment> {
    if content.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Comment content is required".to_string(),
        ));
    }

    if User::find_by_id(pool, caller.user_id).await?.is_none() {
        return Err(ServiceError::NotFound("User not found".to_string()));
    }

    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let team = Team::find_by_id(pool, task.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found for this task".to_string()))?;

    authorize(pool, caller, &team, TeamAction::Comment)
        .await
        .map_err(|e| match e {
            AuthzError::Database(db) => ServiceError::Database(db),
            _ => ServiceError::NotAuthorized(
                "Not authorized to add comments to this task".to_string(),
            ),
        })?;

    let comment = Comment::create(
        pool,
        CreateComment {
            content: content.to_string(),
            user_id: caller.user_id,
            task_id,
        },
    )
    .await?;

    Ok(comment)
}

/// Lists a task's comments in chronological order
///
/// # Errors
///
/// - `NotFound` if the task doesn't resolve (including after it has been
///   cascade-deleted)
/// - `NotAuthorized` if the caller is outside the owning team
pub async fn list_comments(
    pool: &PgPool,
    task_id: Uuid,
    caller: &Actor,
) -> ServiceResult<Vec<Comment>> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let team = Team::find_by_id(pool, task.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found for this task".to_string()))?;

    authorize(pool, caller, &team, TeamAction::Comment)
        .await
        .map_err(|e| match e {
            AuthzError::Database(db) => ServiceError::Database(db),
            _ => ServiceError::NotAuthorized(
                "Not authorized to view comments for this task".to_string(),
            ),
        })?;

    Ok(Comment::find_by_task(pool, task_id).await?)
}
