/// Error handling for the API server
///
/// Provides a unified error type that maps to HTTP responses. Handlers
/// return `ApiResult<T>`, and every workflow-layer error kind converts to
/// the appropriate status code here — the core never sees HTTP.
///
/// # Mapping
///
/// | Workflow kind        | Status |
/// |----------------------|--------|
/// | Validation           | 400    |
/// | NotFound             | 404    |
/// | NotAuthorized        | 403    |
/// | InvalidCredentials   | 401    |
/// | unique-key violation | 409    |
/// | storage failure      | 500    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::auth::middleware::AuthError;
use taskboard_shared::services::ServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate team name
    Conflict(String),

    /// Unprocessable entity (422) - request validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Converts validator's error bag into a 422 with per-field details
pub fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(errors)
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations are user-facing conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return ApiError::Conflict("Username already exists".to_string());
                    }
                    if constraint.contains("teams_name") {
                        return ApiError::Conflict("Team name already exists".to_string());
                    }
                    if constraint.contains("sub_boards_task_id_name") {
                        return ApiError::Conflict(
                            "Sub-board name already exists in this task".to_string(),
                        );
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert workflow-layer errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::NotAuthorized(msg) => ApiError::Forbidden(msg),
            ServiceError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            ServiceError::Hashing(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
            ServiceError::Token(e) => ApiError::InternalError(format!("Token error: {}", e)),
            ServiceError::Database(e) => ApiError::from(e),
        }
    }
}

/// Convert authentication middleware errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::InsufficientRole(role) => ApiError::Forbidden(format!(
                "Role '{}' is not authorized for this route",
                role.as_str()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_service_error_mapping() {
        let err: ApiError = ServiceError::Validation("bad".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = ServiceError::NotFound("gone".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = ServiceError::NotAuthorized("no".to_string()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = ServiceError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_validation_error_display() {
        let errors = vec![
            ValidationErrorDetail {
                field: "username".to_string(),
                message: "Too short".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }
}
