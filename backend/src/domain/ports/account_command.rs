//! Driving port for account use-cases.
//!
//! Inbound adapters call this port to register accounts, issue tokens and
//! resolve the caller behind a presented token.

use async_trait::async_trait;

use crate::domain::{AuthToken, Email, Error, LoginCredentials, Password, User, UserId, UserName};

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Login email.
    pub email: Email,
    /// Plaintext password, hashed before storage.
    pub password: Password,
    /// Display name.
    pub name: UserName,
}

/// Validated self-service profile changes. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New login email.
    pub email: Option<Email>,
    /// New password.
    pub password: Option<Password>,
    /// New display name.
    pub name: Option<UserName>,
}

/// Account registration, token issuance and profile use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a regular account.
    async fn register(&self, account: NewAccount) -> Result<User, Error>;

    /// Check credentials and issue a new API token.
    async fn issue_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;

    /// Resolve the active account behind a raw token value.
    async fn authenticate_token(&self, raw_token: &str) -> Result<User, Error>;

    /// Apply profile changes for the given account.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate)
    -> Result<User, Error>;
}
