/// Authorization predicate for team-scoped actions
///
/// Every business rule about who may touch a team's resources funnels
/// through [`authorize`], a single capability check taking (actor, team,
/// action). Workflow methods call this guard instead of re-deriving
/// admin/member booleans inline.
///
/// # Permission model
///
/// - **ManageTeam / ManageTasks**: the team's admin, and nobody else — the
///   global Admin role does not override per-team ownership here
/// - **ManageBoards**: system Admins or the team admin
/// - **Comment**: system Admins, the team admin, or any team member
/// - **ViewTasks**: any team member (the admin always holds a membership
///   row, written at team creation)

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Team, TeamMember, UserRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Actor is not a member of the team
    #[error("Not a member of team {0}")]
    NotMember(Uuid),

    /// Actor is not the team's admin
    #[error("Not the admin of team {0}")]
    NotTeamAdmin(Uuid),

    /// Actor lacks the capability for this action
    #[error("Not authorized to perform this action")]
    NotAuthorized,

    /// Database error during the membership lookup
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The authenticated principal performing an operation
///
/// Built from validated token claims; carries everything the predicate
/// needs that isn't a database lookup.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    /// User ID
    pub user_id: Uuid,

    /// Global role
    pub role: UserRole,
}

/// Team-scoped capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamAction {
    /// Rename/delete the team, manage membership
    ManageTeam,

    /// Update/delete the team's tasks
    ManageTasks,

    /// Create sub-boards under the team's tasks
    ManageBoards,

    /// Add or read comments on the team's tasks
    Comment,

    /// Read the team's tasks
    ViewTasks,
}

/// Whether the actor is the team's admin
pub fn is_team_admin(actor: &Actor, team: &Team) -> bool {
    team.admin_id == actor.user_id
}

/// Whether the actor may create sub-boards without a membership lookup
///
/// System Admins and the team admin qualify; everyone else needs nothing —
/// board management is never granted by plain membership.
pub fn can_manage_boards(actor: &Actor, team: &Team) -> bool {
    actor.role.is_admin() || is_team_admin(actor, team)
}

/// Checks whether `actor` may perform `action` on `team`
///
/// # Errors
///
/// Returns the precise denial kind: `NotTeamAdmin` for admin-only actions,
/// `NotMember` when membership is required, `NotAuthorized` for the
/// board-management capability. Database failures propagate.
pub async fn authorize(
    db: impl PgExecutor<'_>,
    actor: &Actor,
    team: &Team,
    action: TeamAction,
) -> Result<(), AuthzError> {
    match action {
        TeamAction::ManageTeam | TeamAction::ManageTasks => {
            if is_team_admin(actor, team) {
                Ok(())
            } else {
                Err(AuthzError::NotTeamAdmin(team.id))
            }
        }
        TeamAction::ManageBoards => {
            if can_manage_boards(actor, team) {
                Ok(())
            } else {
                Err(AuthzError::NotAuthorized)
            }
        }
        TeamAction::Comment => {
            if actor.role.is_admin() || is_team_admin(actor, team) {
                return Ok(());
            }
            if TeamMember::has_member(db, team.id, actor.user_id).await? {
                Ok(())
            } else {
                Err(AuthzError::NotMember(team.id))
            }
        }
        TeamAction::ViewTasks => {
            if TeamMember::has_member(db, team.id, actor.user_id).await? {
                Ok(())
            } else {
                Err(AuthzError::NotMember(team.id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn team_with_admin(admin_id: Uuid) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Eng".to_string(),
            description: None,
            admin_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_team_admin() {
        let admin_id = Uuid::new_v4();
        let team = team_with_admin(admin_id);

        let admin_actor = Actor {
            user_id: admin_id,
            role: UserRole::Member,
        };
        let other_actor = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
        };

        assert!(is_team_admin(&admin_actor, &team));
        assert!(!is_team_admin(&other_actor, &team));
    }

    #[test]
    fn test_system_admin_does_not_own_teams() {
        // The global Admin role grants board management, not team ownership
        let team = team_with_admin(Uuid::new_v4());
        let system_admin = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };

        assert!(!is_team_admin(&system_admin, &team));
        assert!(can_manage_boards(&system_admin, &team));
    }

    #[test]
    fn test_can_manage_boards() {
        let admin_id = Uuid::new_v4();
        let team = team_with_admin(admin_id);

        let team_admin = Actor {
            user_id: admin_id,
            role: UserRole::Member,
        };
        let plain_member = Actor {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
        };

        assert!(can_manage_boards(&team_admin, &team));
        assert!(!can_manage_boards(&plain_member, &team));
    }

    #[test]
    fn test_authz_error_display() {
        let id = Uuid::new_v4();
        assert!(AuthzError::NotMember(id).to_string().contains("Not a member"));
        assert!(AuthzError::NotTeamAdmin(id).to_string().contains("Not the admin"));
        assert!(AuthzError::NotAuthorized.to_string().contains("Not authorized"));
    }
}
