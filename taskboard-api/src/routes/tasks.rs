/// Task endpoints, including nested sub-board and comment routes
///
/// Reads are open to any authenticated user — the workflow layer scopes
/// visibility to the caller's teams. Task creation requires team
/// membership; task mutation requires the owning team's admin; sub-board
/// creation requires a system Admin or the team admin. All of those checks
/// live in the workflow layer.
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create a task (team members)
/// - `GET /api/tasks` - List visible tasks with pagination
/// - `GET /api/tasks/:id` - Fetch a task
/// - `PATCH /api/tasks/:id` - Update a task (team admin)
/// - `DELETE /api/tasks/:id` - Delete a task and its children (team admin)
/// - `GET /api/tasks/:task_id/subboards` - List a task's sub-boards
/// - `POST /api/tasks/:task_id/subboards` - Create a sub-board (system Admin or team admin)
/// - `GET /api/tasks/:task_id/comments` - List a task's comments
/// - `POST /api/tasks/:task_id/comments` - Add a comment

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::models::{Comment, SubBoard, Task, TaskPage};
use taskboard_shared::services::{
    comments, sub_boards,
    tasks::{self, CreateTaskInput, UpdateTaskInput},
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    /// Due time (RFC 3339)
    #[validate(length(min = 1, message = "Due time is required"))]
    pub due_time: String,

    /// Optional document link
    pub document_link: Option<String>,

    /// Optional GitHub repository link
    pub github_repo: Option<String>,

    /// The owning team
    pub team_id: Uuid,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    /// New due time (RFC 3339)
    pub due_time: Option<String>,

    /// New document link
    pub document_link: Option<String>,

    /// New GitHub repository link
    pub github_repo: Option<String>,
}

/// Task listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,

    /// Page size (default 10)
    pub limit: Option<i64>,

    /// Restrict to one team; the caller must be a member of it
    pub team_id: Option<Uuid>,
}

/// Create sub-board request (nested under a task)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubBoardRequest {
    /// Sub-board name (unique within the task, case-insensitive)
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional background URL or color
    pub background: Option<String>,
}

/// Add comment request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    /// Comment body
    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,
}

/// Task deletion response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Whether the task (and its children) was deleted
    pub deleted: bool,
}

/// Create a task
///
/// The due time must parse as RFC 3339 and the caller must be a member of
/// the target team.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let task = tasks::create_task(
        &state.db,
        CreateTaskInput {
            title: req.title,
            description: req.description,
            due_time: req.due_time,
            document_link: req.document_link,
            github_repo: req.github_repo,
            creator_id: auth.user_id,
            team_id: req.team_id,
        },
    )
    .await?;

    Ok(Json(task))
}

/// List tasks visible to the caller
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskPage>> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let tasks = tasks::list_tasks(&state.db, auth.user_id, page, limit, query.team_id).await?;

    Ok(Json(tasks))
}

/// Fetch a task (members of the owning team only)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = tasks::get_task(&state.db, id, &auth.actor()).await?;

    Ok(Json(task))
}

/// Update a task (owning team's admin only)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let task = tasks::update_task(
        &state.db,
        id,
        UpdateTaskInput {
            title: req.title,
            description: req.description.map(Some),
            due_time: req.due_time,
            document_link: req.document_link.map(Some),
            github_repo: req.github_repo.map(Some),
        },
        &auth.actor(),
    )
    .await?;

    Ok(Json(task))
}

/// Delete a task with its comments and sub-boards (owning team's admin only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    tasks::delete_task(&state.db, id, &auth.actor()).await?;

    Ok(Json(DeleteTaskResponse { deleted: true }))
}

/// List a task's sub-boards in insertion order
pub async fn list_sub_boards(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<SubBoard>>> {
    let boards = sub_boards::get_sub_boards_by_task(&state.db, task_id).await?;

    Ok(Json(boards))
}

/// Create a sub-board under a task (system Admin or team admin)
pub async fn add_sub_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CreateSubBoardRequest>,
) -> ApiResult<Json<SubBoard>> {
    req.validate().map_err(validation_error)?;

    let board = sub_boards::create_sub_board(
        &state.db,
        &req.name,
        req.background,
        task_id,
        &auth.actor(),
    )
    .await?;

    Ok(Json(board))
}

/// List a task's comments in chronological order
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = comments::list_comments(&state.db, task_id, &auth.actor()).await?;

    Ok(Json(comments))
}

/// Add a comment to a task (team members, team admin, or system Admin)
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate().map_err(validation_error)?;

    let comment = comments::add_comment(&state.db, &req.content, task_id, &auth.actor()).await?;

    Ok(Json(comment))
}
