/// User endpoints: registration, login, and profile management
///
/// # Endpoints
///
/// - `POST /api/users/register` - Register a new user (public)
/// - `POST /api/users/login` - Login and receive a token (public)
/// - `GET /api/users/me` - Fetch own profile
/// - `PATCH /api/users/me` - Update own profile
/// - `DELETE /api/users/me` - Delete own profile

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::models::{User, UserRole};
use taskboard_shared::services::users::{
    self, AuthenticatedUser, Profile, RegisterUser, UpdateProfile,
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional global role; defaults to member
    pub role: Option<UserRole>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New username
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: Option<String>,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Profile deletion response
#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    /// Whether the profile was deleted
    pub deleted: bool,
}

/// Register a new user
///
/// # Errors
///
/// - `422`: request validation failed
/// - `400`: username already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthenticatedUser>> {
    req.validate().map_err(validation_error)?;

    let authenticated = users::register(
        &state.db,
        state.hasher.as_ref(),
        state.jwt_secret(),
        RegisterUser {
            username: req.username,
            password: req.password,
            role: req.role,
        },
    )
    .await?;

    Ok(Json(authenticated))
}

/// Login with username and password
///
/// # Errors
///
/// - `401`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthenticatedUser>> {
    req.validate().map_err(validation_error)?;

    let authenticated = users::login(
        &state.db,
        state.hasher.as_ref(),
        state.jwt_secret(),
        &req.username,
        &req.password,
    )
    .await?;

    Ok(Json(authenticated))
}

/// Fetch the authenticated user's profile with team back-references
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Profile>> {
    let profile = users::get_profile(&state.db, auth.user_id).await?;

    Ok(Json(profile))
}

/// Update the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate().map_err(validation_error)?;

    let user = users::update_profile(
        &state.db,
        state.hasher.as_ref(),
        auth.user_id,
        UpdateProfile {
            username: req.username,
            password: req.password,
        },
    )
    .await?;

    Ok(Json(user))
}

/// Delete the authenticated user's profile
///
/// # Errors
///
/// - `400`: the user still administers a team
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DeleteProfileResponse>> {
    users::delete_profile(&state.db, auth.user_id).await?;

    Ok(Json(DeleteProfileResponse { deleted: true }))
}
