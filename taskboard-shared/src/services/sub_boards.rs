/// Sub-board workflows
///
/// Sub-board names are unique within their task, case-insensitively.
/// Creation is restricted to system Admins and the owning team's admin;
/// update and delete are role-gated at the route layer. The uniqueness
/// pre-check gives a friendly error, and the store's unique index catches
/// whatever slips between check and write.

use sqlx::PgPool;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Actor, AuthzError, TeamAction};
use crate::models::{CreateSubBoard, SubBoard, Task, Team, UpdateSubBoard};

/// Input for updating a sub-board
#[derive(Debug, Clone, Default)]
pub struct UpdateSubBoardInput {
    /// New name (re-checked for uniqueness, excluding this sub-board)
    pub name: Option<String>,

    /// New background (Some(None) clears it)
    pub background: Option<Option<String>>,
}

/// Creates a sub-board under a task
///
/// # Errors
///
/// - `Validation` for an empty or duplicate name (case-insensitive within
///   the task)
/// - `NotFound` if the task or its team doesn't resolve
/// - `NotAuthorized` unless the caller is a system Admin or the owning
///   team's admin
pub async fn create_sub_board(
    pool: &PgPool,
    name: &str,
    background: Option<String>,
    task_id: Uuid,
    caller: &Actor,
) -> ServiceResult<SubBoard> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Sub-board name is required".to_string(),
        ));
    }

    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    let team = Team::find_by_id(pool, task.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found for this task".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageBoards)
        .await
        .map_err(|e| match e {
            AuthzError::Database(db) => ServiceError::Database(db),
            _ => ServiceError::NotAuthorized(
                "Not authorized to add sub-boards to this task".to_string(),
            ),
        })?;

    if SubBoard::name_exists(pool, task_id, name, None).await? {
        return Err(ServiceError::Validation(format!(
            "Sub-board with name '{}' already exists in this task",
            name
        )));
    }

    let sub_board = SubBoard::create(
        pool,
        CreateSubBoard {
            name: name.to_string(),
            task_id,
            background,
        },
    )
    .await?;

    Ok(sub_board)
}

/// Fetches a single sub-board
pub async fn get_sub_board(pool: &PgPool, sub_board_id: Uuid) -> ServiceResult<SubBoard> {
    SubBoard::find_by_id(pool, sub_board_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Sub-board not found".to_string()))
}

/// Lists a task's sub-boards in insertion order
///
/// # Errors
///
/// - `NotFound` if the task doesn't resolve (including after it has been
///   cascade-deleted)
pub async fn get_sub_boards_by_task(
    pool: &PgPool,
    task_id: Uuid,
) -> ServiceResult<Vec<SubBoard>> {
    if Task::find_by_id(pool, task_id).await?.is_none() {
        return Err(ServiceError::NotFound("Task not found".to_string()));
    }

    Ok(SubBoard::find_by_task(pool, task_id).await?)
}

/// Updates a sub-board
///
/// A name change re-checks uniqueness within the owning task, excluding
/// the sub-board's own id.
pub async fn update_sub_board(
    pool: &PgPool,
    sub_board_id: Uuid,
    input: UpdateSubBoardInput,
) -> ServiceResult<SubBoard> {
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Sub-board name cannot be empty".to_string(),
            ));
        }

        let sub_board = SubBoard::find_by_id(pool, sub_board_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Sub-board not found".to_string()))?;

        if SubBoard::name_exists(pool, sub_board.task_id, name, Some(sub_board_id)).await? {
            return Err(ServiceError::Validation(format!(
                "Sub-board with name '{}' already exists in this task",
                name
            )));
        }
    }

    let updated = SubBoard::update(
        pool,
        sub_board_id,
        UpdateSubBoard {
            name: input.name,
            background: input.background,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::NotFound("Sub-board not found".to_string()))?;

    Ok(updated)
}

/// Deletes a sub-board
///
/// The sub-board row is the only record of the attachment, so deletion is
/// a single write.
pub async fn delete_sub_board(pool: &PgPool, sub_board_id: Uuid) -> ServiceResult<()> {
    let deleted = SubBoard::delete(pool, sub_board_id).await?;
    if !deleted {
        return Err(ServiceError::NotFound("Sub-board not found".to_string()));
    }

    Ok(())
}
