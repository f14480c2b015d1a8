/// Credential hashing service
///
/// Password hashing is an explicit, injected service with a
/// `hash`/`verify` contract — it is never embedded in the data model. The
/// default implementation uses Argon2id.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{Argon2Hasher, CredentialHasher};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = Argon2Hasher;
///
/// let hash = hasher.hash("super_secret_password_123")?;
/// assert!(hasher.verify("super_secret_password_123", &hash)?);
/// assert!(!hasher.verify("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for credential hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Contract for hashing and verifying credentials
///
/// The user workflow layer receives this as a trait object so the hashing
/// scheme can be swapped (or stubbed in tests) without touching any
/// business rule.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password into a storable string
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Verifies a plaintext password against a stored hash
    ///
    /// Returns `Ok(false)` for a wrong password; `Err` only for malformed
    /// hashes or operational failures.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id implementation of [`CredentialHasher`]
///
/// Parameters: 64 MB memory, 3 iterations, 4 lanes, 32-byte output, random
/// 16-byte salt from the OS RNG. Verification is constant-time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    fn argon2() -> Result<Argon2<'static>, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(65536)
            .t_cost(3)
            .p_cost(4)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Self::argon2()?;

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Parameters are embedded in the hash string
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!(
                "Verification failed: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_produces_different_salts() {
        let hasher = Argon2Hasher;

        let hash1 = hasher.hash("same_password").unwrap();
        let hash2 = hasher.hash("same_password").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_correct_password() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct_password").unwrap();

        assert!(hasher.verify("correct_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_incorrect_password() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct_password").unwrap();

        assert!(!hasher.verify("wrong_password", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = Argon2Hasher;
        assert!(hasher.verify("password", "not_a_hash").is_err());
        assert!(hasher.verify("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let hasher = Argon2Hasher;
        let passwords = ["simple", "with spaces", "unicode-密码-パスワード"];

        for password in passwords {
            let hash = hasher.hash(password).unwrap();
            assert!(
                hasher.verify(password, &hash).unwrap(),
                "Password '{}' should verify",
                password
            );
        }
    }
}
