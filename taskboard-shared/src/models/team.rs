/// Team model and database operations
///
/// A team has a globally unique name and exactly one admin. The admin is
/// always a member as well; the membership row is written when the team is
/// created. Member lists live in `team_members` (see [`crate::models::team_member`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     description TEXT,
///     admin_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Team owned by a single admin user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID (UUID v4)
    pub id: Uuid,

    /// Globally unique team name (case-sensitive)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// The team admin's user ID
    pub admin_id: Uuid,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeam {
    /// Team name (must be globally unique)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// The creating user, who becomes the team admin
    pub admin_id: Uuid,
}

/// Input for updating an existing team
///
/// Only non-None fields are written. Use `Some(None)` to clear the
/// description.
#[derive(Debug, Clone, Default)]
pub struct UpdateTeam {
    /// New team name
    pub name: Option<String>,

    /// New description (Some(None) clears it)
    pub description: Option<Option<String>>,
}

impl Team {
    /// Creates a new team
    ///
    /// The caller is responsible for also inserting the admin's membership
    /// row; `services::teams::create_team` does both inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists (unique constraint
    /// violation) or the write fails.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateTeam) -> Result<Self, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, admin_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, admin_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.admin_id)
        .fetch_one(db)
        .await?;

        Ok(team)
    }

    /// Finds a team by ID, returning None if the id does not resolve
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, admin_id, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(team)
    }

    /// Finds a team by its exact (case-sensitive) name
    pub async fn find_by_name(
        db: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, admin_id, created_at, updated_at
            FROM teams
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;

        Ok(team)
    }

    /// Updates a team with merge semantics
    ///
    /// # Returns
    ///
    /// The updated team if found, None if the team doesn't exist
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE teams SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, admin_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Team>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let team = q.fetch_optional(db).await?;

        Ok(team)
    }

    /// Deletes a team by ID
    ///
    /// Memberships and tasks (with their sub-boards and comments) go with it
    /// via store-level cascades.
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the team didn't exist
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists teams with pagination, newest first
    pub async fn list(
        db: impl PgExecutor<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, admin_id, created_at, updated_at
            FROM teams
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(teams)
    }

    /// Counts teams administered by a user
    pub async fn count_by_admin(
        db: impl PgExecutor<'_>,
        admin_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams WHERE admin_id = $1")
            .bind(admin_id)
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_team_default() {
        let update = UpdateTeam::default();
        assert!(update.name.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn test_update_team_clear_description() {
        let update = UpdateTeam {
            name: None,
            description: Some(None),
        };
        assert!(matches!(update.description, Some(None)));
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
