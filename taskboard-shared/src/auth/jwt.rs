/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user's id and global role.
/// Every token has a fixed 30-day expiry; there is no refresh flow. The
/// token is verified on every protected call before any business logic
/// runs.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskboard_shared::models::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4(), UserRole::Member);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

/// Token issuer claim value
const ISSUER: &str = "taskboard";

/// Fixed token lifetime
const TOKEN_LIFETIME_DAYS: i64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the user's
/// global role so role allow-lists can be enforced without a database
/// round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Global role (custom claim)
    pub role: UserRole,
}

impl Claims {
    /// Creates new claims with the fixed 30-day expiration
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self::with_expiration(user_id, role, Duration::days(TOKEN_LIFETIME_DAYS))
    }

    /// Creates claims with a custom expiration (used by tests)
    pub fn with_expiration(user_id: Uuid, role: UserRole, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            role,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret. The secret should
/// be at least 32 bytes and kept in configuration, never in code.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired,
/// the issuer doesn't match, or the token is malformed.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::Member);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskboard");
        assert_eq!(claims.role, UserRole::Member);
        assert!(!claims.is_expired());

        // Expiry is 30 days out, give or take a few seconds of test time
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 30 * 24 * 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(user_id, UserRole::Admin);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.iss, "taskboard");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::Member);
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            UserRole::Member,
            Duration::seconds(-3600), // already expired
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_role_survives_roundtrip() {
        let secret = "secret";

        for role in [UserRole::Admin, UserRole::Member] {
            let claims = Claims::new(Uuid::new_v4(), role);
            let token = create_token(&claims, secret).unwrap();
            let validated = validate_token(&token, secret).unwrap();
            assert_eq!(validated.role, role);
        }
    }
}
