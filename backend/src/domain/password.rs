//! Password hashing backed by Argon2id.
//!
//! Hashes are stored as PHC strings so the parameters travel with the hash
//! and verification works across parameter changes.

use argon2::password_hash::{PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

/// Errors raised while deriving a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Salt generation or key derivation failed.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Description of the underlying failure.
        message: String,
    },
}

impl PasswordHashError {
    fn hashing(err: impl std::fmt::Display) -> Self {
        Self::Hashing {
            message: err.to_string(),
        }
    }
}

/// A stored password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string loaded from storage.
    #[must_use]
    pub fn from_phc(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// PHC string suitable for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Hashes and verifies account passwords.
///
/// # Examples
/// ```
/// use recipe_backend::domain::CredentialHasher;
///
/// let hasher = CredentialHasher::fast();
/// let hash = hasher.hash("testpass123").unwrap();
/// assert!(hasher.verify("testpass123", &hash));
/// assert!(!hasher.verify("wrong", &hash));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Hasher using explicit Argon2 cost parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    /// Hasher using the minimum Argon2 cost. Only for tests and local tooling.
    #[must_use]
    pub fn fast() -> Self {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default();
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Derive a salted hash for `password`.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let mut salt_bytes = [0_u8; 16];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(PasswordHashError::hashing)?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordHash(hash.to_string()))
            .map_err(PasswordHashError::hashing)
    }

    /// Check `password` against a stored hash. Malformed hashes never verify.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        PhcString::new(hash.as_str())
            .map(|parsed| {
                self.argon2()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_are_salted() {
        let hasher = CredentialHasher::fast();
        let first = hasher.hash("secret").expect("hash");
        let second = hasher.hash("secret").expect("hash");
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("$argon2id$"));
    }

    #[rstest]
    fn verifies_hash_made_with_other_params() {
        let hash = CredentialHasher::fast().hash("secret").expect("hash");
        assert!(CredentialHasher::default().verify("secret", &hash));
    }

    #[rstest]
    fn malformed_hash_never_verifies() {
        let hasher = CredentialHasher::fast();
        assert!(!hasher.verify("secret", &PasswordHash::from_phc("not-a-phc-string")));
    }
}
