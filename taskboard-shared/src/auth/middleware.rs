/// Authentication middleware for axum
///
/// Validates the Bearer token from the `Authorization` header, then adds an
/// [`AuthContext`] to the request extensions. Absence or invalidity of the
/// token is a hard rejection before any business logic runs. Routes with an
/// explicit role allow-list call [`AuthContext::require_role`] on top.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskboard_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::auth::authorization::Actor;
use crate::models::UserRole;

/// Authentication context added to request extensions
///
/// Handlers extract it with axum's `Extension` extractor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Global role from the token
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the authorization-layer actor for this request
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
        }
    }

    /// Enforces an explicit role allow-list for the current request
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), AuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole(self.role))
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// Authenticated, but the role is not in the route's allow-list
    InsufficientRole(UserRole),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InsufficientRole(role) => (
                StatusCode::FORBIDDEN,
                format!("Role '{}' is not authorized for this route", role.as_str()),
            )
                .into_response(),
        }
    }
}

/// JWT authentication middleware
///
/// Validates the token from `Authorization: Bearer <token>` and injects
/// [`AuthContext`] into request extensions.
///
/// # Errors
///
/// Returns 401 if the header is missing, the token is invalid, or the
/// token has expired; 400 if the header is not a Bearer token.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        role: claims.role,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Captures the JWT secret and returns a function usable with
/// `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_actor() {
        let user_id = Uuid::new_v4();
        let context = AuthContext {
            user_id,
            role: UserRole::Admin,
        };

        let actor = context.actor();
        assert_eq!(actor.user_id, user_id);
        assert_eq!(actor.role, UserRole::Admin);
    }

    #[test]
    fn test_require_role() {
        let context = AuthContext {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
        };

        assert!(context.require_role(&[UserRole::Admin, UserRole::Member]).is_ok());
        assert!(matches!(
            context.require_role(&[UserRole::Admin]),
            Err(AuthError::InsufficientRole(UserRole::Member))
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::InsufficientRole(UserRole::Member).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
