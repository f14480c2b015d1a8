/// User registration, login, and profile workflows
///
/// Registration and login return the user together with a signed 30-day
/// token; the password hash never leaves this layer in serialized form.
/// The credential hasher is injected so the hashing scheme is not welded
/// to the workflow.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::jwt::{self, Claims};
use crate::auth::password::CredentialHasher;
use crate::models::{CreateUser, TeamMember, UpdateUser, User, UserRole};

/// Input for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// Desired username (must be unique)
    pub username: String,

    /// Plaintext password (hashed here, never stored)
    pub password: String,

    /// Optional global role; defaults to Member
    pub role: Option<UserRole>,
}

/// A user together with a freshly issued auth token
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    /// The account (password hash is never serialized)
    pub user: User,

    /// Signed JWT, valid for 30 days
    pub token: String,
}

/// A user profile with the computed team back-references
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// The account
    #[serde(flatten)]
    pub user: User,

    /// Ids of the teams the user belongs to
    pub team_ids: Vec<Uuid>,
}

/// Input for updating a profile
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    /// New username
    pub username: Option<String>,

    /// New plaintext password (hashed here)
    pub password: Option<String>,
}

/// Registers a new user
///
/// # Errors
///
/// - `Validation` if the username is empty or already taken
/// - `Database` on storage failure
pub async fn register(
    pool: &PgPool,
    hasher: &dyn CredentialHasher,
    jwt_secret: &str,
    input: RegisterUser,
) -> ServiceResult<AuthenticatedUser> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(ServiceError::Validation("Username is required".to_string()));
    }

    if User::find_by_username(pool, username).await?.is_some() {
        return Err(ServiceError::Validation("User already exists".to_string()));
    }

    let password_hash = hasher.hash(&input.password)?;

    let user = User::create(
        pool,
        CreateUser {
            username: username.to_string(),
            password_hash,
            role: input.role.unwrap_or(UserRole::Member),
        },
    )
    .await?;

    let token = jwt::create_token(&Claims::new(user.id, user.role), jwt_secret)?;

    Ok(AuthenticatedUser { user, token })
}

/// Authenticates a user by username and password
///
/// # Errors
///
/// - `InvalidCredentials` for an unknown username or wrong password — the
///   two cases are indistinguishable to the caller
pub async fn login(
    pool: &PgPool,
    hasher: &dyn CredentialHasher,
    jwt_secret: &str,
    username: &str,
    password: &str,
) -> ServiceResult<AuthenticatedUser> {
    let user = User::find_by_username(pool, username)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;

    if !hasher.verify(password, &user.password_hash)? {
        return Err(ServiceError::InvalidCredentials);
    }

    let token = jwt::create_token(&Claims::new(user.id, user.role), jwt_secret)?;

    Ok(AuthenticatedUser { user, token })
}

/// Fetches a user's profile with their team back-references
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> ServiceResult<Profile> {
    let user = User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    let team_ids = TeamMember::list_team_ids_by_user(pool, user_id).await?;

    Ok(Profile { user, team_ids })
}

/// Updates a user's profile with merge semantics
///
/// # Errors
///
/// - `NotFound` if the user doesn't exist
/// - `Validation` if the new username is taken by another user
pub async fn update_profile(
    pool: &PgPool,
    hasher: &dyn CredentialHasher,
    user_id: Uuid,
    input: UpdateProfile,
) -> ServiceResult<User> {
    if let Some(ref username) = input.username {
        if username.trim().is_empty() {
            return Err(ServiceError::Validation("Username cannot be empty".to_string()));
        }
        if let Some(existing) = User::find_by_username(pool, username).await? {
            if existing.id != user_id {
                return Err(ServiceError::Validation(
                    "Username is already taken".to_string(),
                ));
            }
        }
    }

    let password_hash = match input.password {
        Some(ref password) => Some(hasher.hash(password)?),
        None => None,
    };

    let user = User::update(
        pool,
        user_id,
        UpdateUser {
            username: input.username,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    Ok(user)
}

/// Deletes a user's profile
///
/// Deletion is refused while the user still administers a team, so team
/// ownership can never dangle. Memberships, authored tasks, and comments
/// are removed by store-level cascades.
///
/// # Errors
///
/// - `NotFound` if the user doesn't exist
/// - `Validation` if the user is still a team admin
pub async fn delete_profile(pool: &PgPool, user_id: Uuid) -> ServiceResult<()> {
    if User::find_by_id(pool, user_id).await?.is_none() {
        return Err(ServiceError::NotFound("User not found".to_string()));
    }

    let administered = crate::models::Team::count_by_admin(pool, user_id).await?;
    if administered > 0 {
        return Err(ServiceError::Validation(
            "Cannot delete profile while administering teams; transfer or delete them first"
                .to_string(),
        ));
    }

    User::delete(pool, user_id).await?;
    Ok(())
}
