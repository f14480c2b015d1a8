/// Team membership model and database operations
///
/// Many-to-many relationship between users and teams. This table is the
/// single source of truth for membership: a team's member set and a user's
/// team list are both queries against it, so there is no parent-side id
/// array to keep in sync.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// A user's membership in a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Adds a user to a team
    ///
    /// Idempotent: adding an existing member is a no-op.
    ///
    /// # Returns
    ///
    /// True if a new membership row was inserted, false if the user was
    /// already a member
    ///
    /// # Errors
    ///
    /// Returns an error if the team or user doesn't exist (foreign key
    /// violation) or the write fails.
    pub async fn add(
        db: impl PgExecutor<'_>,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a user from a team
    ///
    /// Removing an absent membership is not an error.
    ///
    /// # Returns
    ///
    /// True if a membership row was deleted, false if none existed
    pub async fn remove(
        db: impl PgExecutor<'_>,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a user is a member of a team
    pub async fn has_member(
        db: impl PgExecutor<'_>,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(exists)
    }

    /// Lists all memberships of a team, oldest first
    pub async fn list_by_team(
        db: impl PgExecutor<'_>,
        team_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let members = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT team_id, user_id, created_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(db)
        .await?;

        Ok(members)
    }

    /// Lists the ids of all teams a user belongs to
    ///
    /// This is the computed back-reference that replaces a stored team-id
    /// array on the user record.
    pub async fn list_team_ids_by_user(
        db: impl PgExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT team_id
            FROM team_members
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(ids)
    }
}
