/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with
/// all routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /api/
///     ├── /users/
///     │   ├── POST   /register       # Public
///     │   ├── POST   /login          # Public
///     │   └── GET/PATCH/DELETE /me   # Authenticated
///     ├── /teams/                    # Authenticated; ownership checked per team
///     ├── /tasks/                    # Authenticated; ownership checked per team
///     └── /subboards/                # Authenticated; mutations Admin-only
/// ```
///
/// # Middleware stack
///
/// Applied in order: tower-http TraceLayer, CorsLayer, then per-router JWT
/// authentication and role guards.

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::{
    jwt,
    middleware::AuthContext,
    password::{Argon2Hasher, CredentialHasher},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; internals
/// are Arc'd so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Injected credential-hashing service
    pub hasher: Arc<dyn CredentialHasher>,
}

impl AppState {
    /// Creates new application state with the default Argon2 hasher
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            hasher: Arc::new(Argon2Hasher),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth endpoints
    let user_public = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login));

    // Profile endpoints (authenticated)
    let user_protected = Router::new()
        .route(
            "/me",
            get(routes::users::get_profile)
                .patch(routes::users::update_profile)
                .delete(routes::users::delete_profile),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let user_routes = user_public.merge(user_protected);

    let member_routes = Router::new().route(
        "/:team_id/members",
        post(routes::teams::add_member).delete(routes::teams::remove_member),
    );

    let team_routes = Router::new()
        .route(
            "/",
            get(routes::teams::list_teams).post(routes::teams::create_team),
        )
        .route(
            "/:id",
            get(routes::teams::get_team)
                .patch(routes::teams::update_team)
                .delete(routes::teams::delete_team),
        )
        .merge(member_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/:task_id/subboards",
            get(routes::tasks::list_sub_boards).post(routes::tasks::add_sub_board),
        )
        .route(
            "/:task_id/comments",
            get(routes::tasks::list_comments).post(routes::tasks::add_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let sub_board_routes = Router::new()
        .route(
            "/:id",
            get(routes::sub_boards::get_sub_board)
                .patch(routes::sub_boards::update_sub_board)
                .delete(routes::sub_boards::delete_sub_board),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/teams", team_routes)
        .nest("/tasks", task_routes)
        .nest("/subboards", sub_board_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the token from the Authorization header, then
/// injects [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())
        .map_err(|e| crate::error::ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        role: claims.role,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
