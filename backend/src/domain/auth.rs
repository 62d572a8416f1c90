//! Authentication primitives: login credentials and API tokens.
//!
//! Tokens are 40 lowercase hex characters handed to the client once. Only
//! their SHA-256 digest is persisted, so a leaked token table cannot be
//! replayed.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Minimum accepted password length for registration and updates.
pub const PASSWORD_MIN: usize = 5;

const TOKEN_BYTES: usize = 20;
const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Password validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// Fewer than [`PASSWORD_MIN`] characters.
    #[error("Ensure this field has at least {min} characters.")]
    TooShort {
        /// Minimum length.
        min: usize,
    },
}

/// A plaintext password that satisfies the account password policy.
///
/// The buffer is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Check the password policy.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::Password;
    ///
    /// assert!(Password::new("pw").is_err());
    /// assert!(Password::new("testpass123").is_ok());
    /// ```
    ///
    /// # Errors
    /// [`PasswordValidationError::TooShort`] below [`PASSWORD_MIN`].
    pub fn new(raw: &str) -> Result<Self, PasswordValidationError> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// The plaintext, for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Missing login fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// No email was submitted.
    #[error("email must not be empty")]
    EmptyEmail,
    /// No password was submitted.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Credentials presented to the token endpoint.
///
/// The email is trimmed; the password is kept verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Submitted email, as typed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Submitted password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Opaque API token returned to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Parse a token presented by a client. Returns `None` for anything that
    /// could not have been issued by [`AuthToken::generate`].
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::AuthToken;
    ///
    /// assert!(AuthToken::parse("not-a-token").is_none());
    /// let issued = AuthToken::generate();
    /// assert_eq!(AuthToken::parse(issued.as_str()), Some(issued));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == TOKEN_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(Zeroizing::new(raw.to_owned())))
    }

    /// The token text sent to the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Digest used as the storage key for this token.
    #[must_use]
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// SHA-256 hex digest of an [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest loaded from storage.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_tokens_are_distinct_hex() {
        let first = AuthToken::generate();
        let second = AuthToken::generate();
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 40);
        assert!(AuthToken::parse(first.as_str()).is_some());
    }

    #[rstest]
    #[case("")]
    #[case("ABCDEF0123456789ABCDEF0123456789ABCDEF01")]
    #[case("abc")]
    #[case("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz")]
    fn parse_rejects_foreign_values(#[case] raw: &str) {
        assert!(AuthToken::parse(raw).is_none());
    }

    #[rstest]
    fn digest_is_stable_and_differs_from_token() {
        let token = AuthToken::generate();
        assert_eq!(token.digest(), token.digest());
        assert_ne!(token.digest().as_str(), token.as_str());
        assert_eq!(token.digest().as_str().len(), 64);
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("  ", "pw", LoginValidationError::EmptyEmail)]
    #[case("a@b.c", "", LoginValidationError::EmptyPassword)]
    fn login_requires_both_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(
            LoginCredentials::try_from_parts(email, password),
            Err(expected)
        );
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = Password::new("secret123").expect("valid");
        assert_eq!(format!("{password:?}"), "Password(..)");
    }
}
