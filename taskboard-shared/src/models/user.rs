/// User model and database operations
///
/// Users register with a unique username and carry a global role. Team
/// membership is held in the `team_members` table; a user's team list is a
/// computed back-reference, never a stored array.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'member');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(64) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Global role carried by every user account
///
/// `Admin` grants cross-team rights for select operations (creating
/// sub-boards on any task, commenting anywhere). Everything else is decided
/// by per-team membership and team adminship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// System-wide administrator
    Admin,

    /// Regular user
    Member,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }

    /// Whether this role is the system administrator role
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User account
///
/// The password hash is never serialized; responses built from this struct
/// cannot leak it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique username
    pub username: String,

    /// Argon2id password hash, excluded from all serialized output
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Global role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Unique username
    pub username: String,

    /// Argon2id password hash (never a plaintext password)
    pub password_hash: String,

    /// Global role (defaults to Member at the service layer)
    pub role: UserRole,
}

/// Input for updating an existing user
///
/// Only non-None fields are written; everything else keeps its value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New username
    pub username: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (unique constraint
    /// violation) or the database write fails.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID, returning None if the id does not resolve
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact match)
    pub async fn find_by_username(
        db: impl PgExecutor<'_>,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Updates a user with merge semantics
    ///
    /// Only non-None fields in `data` overwrite stored values; `updated_at`
    /// is bumped automatically.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if the user doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the new username is already taken or the write
    /// fails.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE dynamically from the fields that are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.username.is_some() {
            bind_count += 1;
            query.push_str(&format!(", username = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, password_hash, role, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }

        let user = q.fetch_optional(db).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the user didn't exist
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Member.as_str(), "member");
    }

    #[test]
    fn test_user_role_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Member.is_admin());
    }

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.username.is_none());
        assert!(update.password_hash.is_none());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Member,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
