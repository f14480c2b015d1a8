/// Team lifecycle and membership workflows
///
/// Team names are globally unique (case-sensitive). The creator becomes
/// both admin and sole initial member; both rows are written in a single
/// transaction so the "admin is always a member" invariant cannot be
/// half-applied. Membership is a join-table row, so adding/removing a
/// member touches exactly one record — there is no second back-reference
/// write to race against.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Actor, TeamAction};
use crate::models::{CreateTeam, Team, TeamMember, UpdateTeam, User};

/// A team together with its member ids, oldest membership first
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    /// The team record
    #[serde(flatten)]
    pub team: Team,

    /// Member user ids (the admin is always among them)
    pub member_ids: Vec<Uuid>,
}

async fn detail(pool: &PgPool, team: Team) -> ServiceResult<TeamDetail> {
    let member_ids = TeamMember::list_by_team(pool, team.id)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();

    Ok(TeamDetail { team, member_ids })
}

/// Creates a new team
///
/// # Errors
///
/// - `Validation` if the name is empty or already taken
pub async fn create_team(
    pool: &PgPool,
    name: &str,
    description: Option<String>,
    admin_id: Uuid,
) -> ServiceResult<TeamDetail> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("Team name is required".to_string()));
    }

    if Team::find_by_name(pool, name).await?.is_some() {
        return Err(ServiceError::Validation(
            "Team with this name already exists".to_string(),
        ));
    }

    // Team row and the admin's membership row commit together; the unique
    // index on teams.name is the backstop for a concurrent create.
    let mut tx = pool.begin().await?;

    let team = Team::create(
        &mut *tx,
        CreateTeam {
            name: name.to_string(),
            description,
            admin_id,
        },
    )
    .await?;

    TeamMember::add(&mut *tx, team.id, admin_id).await?;

    tx.commit().await?;

    tracing::info!(team_id = %team.id, admin_id = %admin_id, "Team created");

    detail(pool, team).await
}

/// Fetches a team with its member list
pub async fn get_team(pool: &PgPool, team_id: Uuid) -> ServiceResult<TeamDetail> {
    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    detail(pool, team).await
}

/// Lists teams with pagination, newest first
pub async fn list_teams(pool: &PgPool, limit: i64, offset: i64) -> ServiceResult<Vec<Team>> {
    Ok(Team::list(pool, limit, offset).await?)
}

/// Updates a team's name or description
///
/// Only the team's admin may do this.
///
/// # Errors
///
/// - `NotFound` if the team doesn't exist
/// - `NotAuthorized` if the caller is not the team admin
pub async fn update_team(
    pool: &PgPool,
    team_id: Uuid,
    data: UpdateTeam,
    caller: &Actor,
) -> ServiceResult<TeamDetail> {
    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageTeam).await?;

    let updated = Team::update(pool, team_id, data)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    detail(pool, updated).await
}

/// Deletes a team
///
/// Only the team's admin may do this. Memberships and the team's tasks
/// (with their sub-boards and comments) are removed by store-level
/// cascades.
pub async fn delete_team(pool: &PgPool, team_id: Uuid, caller: &Actor) -> ServiceResult<()> {
    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageTeam).await?;

    Team::delete(pool, team_id).await?;

    tracing::info!(team_id = %team_id, "Team deleted");

    Ok(())
}

/// Adds a member to a team
///
/// Only the team's admin may invoke this.
///
/// # Errors
///
/// - `NotFound` if the team or the user doesn't exist
/// - `NotAuthorized` if the caller is not the team admin
/// - `Validation` if the user is already a member
pub async fn add_member(
    pool: &PgPool,
    team_id: Uuid,
    member_id: Uuid,
    caller: &Actor,
) -> ServiceResult<TeamDetail> {
    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageTeam).await?;

    if User::find_by_id(pool, member_id).await?.is_none() {
        return Err(ServiceError::NotFound("Member user not found".to_string()));
    }

    if TeamMember::has_member(pool, team_id, member_id).await? {
        return Err(ServiceError::Validation(
            "User is already a member of this team".to_string(),
        ));
    }

    TeamMember::add(pool, team_id, member_id).await?;

    detail(pool, team).await
}

/// Removes a member from a team
///
/// Only the team's admin may invoke this; the admin can never be removed
/// through this operation. Removing a user who is not a member is a no-op.
///
/// # Errors
///
/// - `NotFound` if the team doesn't exist
/// - `NotAuthorized` if the caller is not the team admin
/// - `Validation` when attempting to remove the admin
pub async fn remove_member(
    pool: &PgPool,
    team_id: Uuid,
    member_id: Uuid,
    caller: &Actor,
) -> ServiceResult<TeamDetail> {
    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))?;

    authorize(pool, caller, &team, TeamAction::ManageTeam).await?;

    if team.admin_id == member_id {
        return Err(ServiceError::Validation(
            "Cannot remove team admin from members".to_string(),
        ));
    }

    TeamMember::remove(pool, team_id, member_id).await?;

    detail(pool, team).await
}
