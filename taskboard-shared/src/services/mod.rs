//! Authorization and workflow layer.
//!
//! Every operation the API exposes is implemented here as a function that
//! runs its guards (role, membership, ownership, uniqueness, input shape)
//! before touching the repository layer, and surfaces failures as a typed
//! [`ServiceError`]. The access layer maps these kinds to transport status
//! codes; nothing here is retried.

pub mod comments;
pub mod sub_boards;
pub mod tasks;
pub mod teams;
pub mod users;

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;

/// Result type for workflow operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unified error type for the workflow layer
///
/// Guard failures fail fast with the precise kind; repository-level I/O
/// failures propagate as `Database` and are treated as fatal by the
/// boundary layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing input, schema violation, or duplicate
    /// uniqueness key
    #[error("{0}")]
    Validation(String),

    /// An entity id did not resolve
    #[error("{0}")]
    NotFound(String),

    /// Authenticated, but lacking role, membership, or ownership
    #[error("{0}")]
    NotAuthorized(String),

    /// Bad credentials at login
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Credential hashing failure (operational, not a user error)
    #[error("Credential hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    /// Token creation failure (operational, not a user error)
    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    /// Storage failure; fatal for the request
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Database(e) => ServiceError::Database(e),
            other => ServiceError::NotAuthorized(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_authz_error_maps_to_not_authorized() {
        let err: ServiceError = AuthzError::NotMember(Uuid::new_v4()).into();
        assert!(matches!(err, ServiceError::NotAuthorized(_)));

        let err: ServiceError = AuthzError::NotTeamAdmin(Uuid::new_v4()).into();
        assert!(matches!(err, ServiceError::NotAuthorized(_)));
    }

    #[test]
    fn test_authz_database_error_stays_fatal() {
        let err: ServiceError = AuthzError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
