/// Team endpoints
///
/// Any authenticated user may create a team and becomes its admin. Team
/// mutation and membership management are restricted to the team's admin;
/// that ownership check lives in the workflow layer.
///
/// # Endpoints
///
/// - `POST /api/teams` - Create a team
/// - `GET /api/teams` - List teams
/// - `GET /api/teams/:id` - Fetch a team with members
/// - `PATCH /api/teams/:id` - Update a team (team admin)
/// - `DELETE /api/teams/:id` - Delete a team (team admin)
/// - `POST /api/teams/:team_id/members` - Add a member (team admin)
/// - `DELETE /api/teams/:team_id/members` - Remove a member (team admin)

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
use taskboard_shared::models::{Team, UpdateTeam};
use taskboard_shared::services::teams::{self, TeamDetail};
use uuid::Uuid;
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name (globally unique)
    #[validate(length(min = 1, max = 255, message = "Team name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Update team request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    /// New team name
    #[validate(length(min = 1, max = 255, message = "Team name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Team listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListTeamsQuery {
    /// Maximum teams to return (default 50)
    pub limit: Option<i64>,

    /// Offset into the listing (default 0)
    pub offset: Option<i64>,
}

/// Membership mutation request
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    /// The user to add or remove
    pub member_id: Uuid,
}

/// Team deletion response
#[derive(Debug, Serialize)]
pub struct DeleteTeamResponse {
    /// Whether the team was deleted
    pub deleted: bool,
}

/// Create a team
///
/// The caller becomes the team's admin and sole initial member.
pub async fn create_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<Json<TeamDetail>> {
    req.validate().map_err(validation_error)?;

    let team = teams::create_team(&state.db, &req.name, req.description, auth.user_id).await?;

    Ok(Json(team))
}

/// List teams with pagination
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<ListTeamsQuery>,
) -> ApiResult<Json<Vec<Team>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let teams = teams::list_teams(&state.db, limit, offset).await?;

    Ok(Json(teams))
}

/// Fetch a team with its member list
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TeamDetail>> {
    let team = teams::get_team(&state.db, id).await?;

    Ok(Json(team))
}

/// Update a team (team admin only)
pub async fn update_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<TeamDetail>> {
    req.validate().map_err(validation_error)?;

    let team = teams::update_team(
        &state.db,
        id,
        UpdateTeam {
            name: req.name,
            description: req.description.map(Some),
        },
        &auth.actor(),
    )
    .await?;

    Ok(Json(team))
}

/// Delete a team (team admin only)
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTeamResponse>> {
    teams::delete_team(&state.db, id, &auth.actor()).await?;

    Ok(Json(DeleteTeamResponse { deleted: true }))
}

/// Add a member to a team (team admin only)
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> ApiResult<Json<TeamDetail>> {
    let team = teams::add_member(&state.db, team_id, req.member_id, &auth.actor()).await?;

    Ok(Json(team))
}

/// Remove a member from a team (team admin only; never the admin)
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> ApiResult<Json<TeamDetail>> {
    let team = teams::remove_member(&state.db, team_id, req.member_id, &auth.actor()).await?;

    Ok(Json(team))
}
