//! User accounts.
//!
//! Accounts are identified by a normalised email address. New accounts are
//! built through [`User::create_user`] or [`User::create_superuser`], which
//! hash the password before anything is stored.

use std::fmt;

use uuid::Uuid;

use super::password::{CredentialHasher, PasswordHash, PasswordHashError};

/// Maximum stored length of an email address.
pub const EMAIL_MAX: usize = 255;
/// Maximum stored length of a display name.
pub const NAME_MAX: usize = 255;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// No email was supplied.
    #[error("users must have an email address")]
    MissingEmail,
    /// The email has no usable local or domain part.
    #[error("enter a valid email address")]
    InvalidEmail,
    /// The email exceeds [`EMAIL_MAX`] characters.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Character limit.
        max: usize,
    },
    /// The name exceeds [`NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Character limit.
        max: usize,
    },
    /// The id is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
}

/// Failure while building a new account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewUserError {
    /// A field failed validation.
    #[error(transparent)]
    Invalid(#[from] UserValidationError),
    /// The password could not be hashed.
    #[error(transparent)]
    Hashing(#[from] PasswordHashError),
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a textual UUID.
    ///
    /// # Errors
    /// [`UserValidationError::InvalidId`] for anything but a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address with a lowercased domain part.
///
/// The local part keeps its case because mail servers may treat it as
/// case sensitive.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Email;
///
/// let email = Email::parse("Test@EXAMPLE.com").unwrap();
/// assert_eq!(email.as_str(), "Test@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Trim, check and normalise a raw email address.
    ///
    /// # Errors
    /// [`UserValidationError`] for a missing, malformed or overlong address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::MissingEmail);
        }
        let (local, domain) = trimmed
            .rsplit_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        if local.is_empty() || domain.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let normalised = format!("{local}@{}", domain.to_lowercase());
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        Ok(Self(normalised))
    }

    /// Normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name. May be empty for accounts created outside registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Trim and length-check a raw name.
    ///
    /// # Errors
    /// [`UserValidationError::NameTooLong`] past [`NAME_MAX`] characters.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Whether the name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Permission flags carried by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFlags {
    /// Inactive accounts cannot authenticate.
    pub is_active: bool,
    /// May use administrative tooling.
    pub is_staff: bool,
    /// Holds every permission.
    pub is_superuser: bool,
}

impl Default for UserFlags {
    fn default() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }
}

impl UserFlags {
    /// Flags granted to administrative accounts.
    #[must_use]
    pub const fn superuser() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: UserName,
    password_hash: PasswordHash,
    flags: UserFlags,
}

impl User {
    /// Reassemble an account from stored parts.
    #[must_use]
    pub fn new(
        id: UserId,
        email: Email,
        name: UserName,
        password_hash: PasswordHash,
        flags: UserFlags,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            flags,
        }
    }

    /// Build a regular account, hashing `password`.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{CredentialHasher, User};
    ///
    /// let hasher = CredentialHasher::fast();
    /// let user = User::create_user(Some("test@TEST.COM"), "testpass123", "", &hasher).unwrap();
    /// assert_eq!(user.email().as_str(), "test@test.com");
    /// assert!(User::create_user(None, "testpass123", "", &hasher).is_err());
    /// ```
    pub fn create_user(
        email: Option<&str>,
        password: &str,
        name: &str,
        hasher: &CredentialHasher,
    ) -> Result<Self, NewUserError> {
        Self::build(email, password, name, hasher, UserFlags::default())
    }

    /// Build an administrative account with staff and superuser flags set.
    pub fn create_superuser(
        email: Option<&str>,
        password: &str,
        name: &str,
        hasher: &CredentialHasher,
    ) -> Result<Self, NewUserError> {
        Self::build(email, password, name, hasher, UserFlags::superuser())
    }

    fn build(
        email: Option<&str>,
        password: &str,
        name: &str,
        hasher: &CredentialHasher,
        flags: UserFlags,
    ) -> Result<Self, NewUserError> {
        let email = Email::parse(email.ok_or(UserValidationError::MissingEmail)?)?;
        let name = UserName::new(name)?;
        let password_hash = hasher.hash(password)?;
        Ok(Self::new(UserId::random(), email, name, password_hash, flags))
    }

    /// Account id.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Login email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Permission flags.
    #[must_use]
    pub const fn flags(&self) -> UserFlags {
        self.flags
    }

    /// Whether the account may authenticate.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.flags.is_active
    }

    /// Replace the email address.
    pub fn set_email(&mut self, email: Email) {
        self.email = email;
    }

    /// Replace the display name.
    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
    }

    /// Replace the stored password hash.
    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }

    /// Check a plaintext password. Inactive accounts never match.
    #[must_use]
    pub fn check_password(&self, password: &str, hasher: &CredentialHasher) -> bool {
        self.is_active() && hasher.verify(password, &self.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> CredentialHasher {
        CredentialHasher::fast()
    }

    #[rstest]
    fn create_user_with_email_succeeds(hasher: CredentialHasher) {
        let user = User::create_user(Some("test@example.com"), "testpass123", "", &hasher)
            .expect("user is created");
        assert_eq!(user.email().as_str(), "test@example.com");
        assert!(user.check_password("testpass123", &hasher));
        assert!(!user.check_password("wrongpass", &hasher));
        assert_eq!(user.flags(), UserFlags::default());
    }

    #[rstest]
    #[case("test@TEST.COM", "test@test.com")]
    #[case("Test2@Example.com", "Test2@example.com")]
    #[case("  TEST3@EXAMPLE.COM ", "TEST3@example.com")]
    #[case("test4@example.COM", "test4@example.com")]
    fn new_user_email_domain_is_normalised(
        hasher: CredentialHasher,
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        let user = User::create_user(Some(raw), "sample123", "", &hasher).expect("user");
        assert_eq!(user.email().as_str(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn new_user_without_email_fails(hasher: CredentialHasher, #[case] email: Option<&str>) {
        let result = User::create_user(email, "test123", "", &hasher);
        assert_eq!(
            result,
            Err(NewUserError::Invalid(UserValidationError::MissingEmail))
        );
    }

    #[rstest]
    #[case("no-at-sign")]
    #[case("@example.com")]
    #[case("user@")]
    #[case("us er@example.com")]
    fn malformed_email_is_rejected(#[case] raw: &str) {
        assert_eq!(Email::parse(raw), Err(UserValidationError::InvalidEmail));
    }

    #[rstest]
    fn create_superuser_sets_admin_flags(hasher: CredentialHasher) {
        let user =
            User::create_superuser(Some("admin@example.com"), "test123", "", &hasher).expect("user");
        assert!(user.flags().is_staff);
        assert!(user.flags().is_superuser);
        assert!(user.is_active());
    }

    #[rstest]
    fn inactive_user_never_matches_password(hasher: CredentialHasher) {
        let mut flags = UserFlags::default();
        flags.is_active = false;
        let hash = hasher.hash("secret").expect("hash");
        let user = User::new(
            UserId::random(),
            Email::parse("a@b.c").expect("email"),
            UserName::default(),
            hash,
            flags,
        );
        assert!(!user.check_password("secret", &hasher));
    }

    #[rstest]
    fn name_longer_than_limit_is_rejected() {
        let long = "x".repeat(NAME_MAX + 1);
        assert_eq!(
            UserName::new(&long),
            Err(UserValidationError::NameTooLong { max: NAME_MAX })
        );
    }
}
