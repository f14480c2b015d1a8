/// Sub-board endpoints (standalone, outside the task nesting)
///
/// # Endpoints
///
/// - `GET /api/subboards/:id` - Fetch a sub-board
/// - `PATCH /api/subboards/:id` - Update a sub-board (Admin)
/// - `DELETE /api/subboards/:id` - Delete a sub-board (Admin)

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::models::{SubBoard, UserRole};
use taskboard_shared::services::sub_boards::{self, UpdateSubBoardInput};
use uuid::Uuid;
use validator::Validate;

/// Update sub-board request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubBoardRequest {
    /// New name (re-checked for uniqueness within the task)
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New background URL or color
    pub background: Option<String>,
}

/// Sub-board deletion response
#[derive(Debug, Serialize)]
pub struct DeleteSubBoardResponse {
    /// Whether the sub-board was deleted
    pub deleted: bool,
}

/// Fetch a single sub-board
pub async fn get_sub_board(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SubBoard>> {
    let board = sub_boards::get_sub_board(&state.db, id).await?;

    Ok(Json(board))
}

/// Update a sub-board
pub async fn update_sub_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubBoardRequest>,
) -> ApiResult<Json<SubBoard>> {
    auth.require_role(&[UserRole::Admin])?;
    req.validate().map_err(validation_error)?;

    let board = sub_boards::update_sub_board(
        &state.db,
        id,
        UpdateSubBoardInput {
            name: req.name,
            background: req.background.map(Some),
        },
    )
    .await?;

    Ok(Json(board))
}

/// Delete a sub-board
pub async fn delete_sub_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteSubBoardResponse>> {
    auth.require_role(&[UserRole::Admin])?;

    sub_boards::delete_sub_board(&state.db, id).await?;

    Ok(Json(DeleteSubBoardResponse { deleted: true }))
}
