//! Account use-cases: registration, token issuance and token resolution.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, NewAccount, ProfileUpdate, TokenPersistenceError, TokenRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthToken, CredentialHasher, Email, Error, FieldError, LoginCredentials, PasswordHash, User,
    UserFlags, UserId,
};

const BAD_CREDENTIALS: &str = "Unable to authenticate with provided credentials.";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            let field = FieldError::new(
                "email",
                "unique",
                "user with this email already exists.",
            );
            Error::conflict(field.message().to_owned()).with_details(json!({ "fields": [field] }))
        }
    }
}

fn map_token_error(error: TokenPersistenceError) -> Error {
    match error {
        TokenPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        TokenPersistenceError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn bad_credentials() -> Error {
    Error::validation(vec![FieldError::new(
        "non_field_errors",
        "authentication",
        BAD_CREDENTIALS,
    )])
}

/// Account service implementing [`AccountCommand`].
pub struct AccountService<U: ?Sized, T: ?Sized> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: CredentialHasher,
}

impl<U: ?Sized, T: ?Sized> AccountService<U, T> {
    /// Create a service over the given repositories.
    #[must_use]
    pub fn new(users: Arc<U>, tokens: Arc<T>, hasher: CredentialHasher) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Argon2 work runs on the blocking pool.
    async fn hash(&self, password: String) -> Result<PasswordHash, Error> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn verify(&self, user: User, password: String) -> Result<bool, Error> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || user.check_password(&password, &hasher))
            .await
            .map_err(|err| Error::internal(format!("verification task failed: {err}")))
    }
}

#[async_trait]
impl<U, T> AccountCommand for AccountService<U, T>
where
    U: UserRepository + ?Sized,
    T: TokenRepository + ?Sized,
{
    async fn register(&self, account: NewAccount) -> Result<User, Error> {
        let NewAccount {
            email,
            password,
            name,
        } = account;
        let password_hash = self.hash(password.expose().to_owned()).await?;
        let user = User::new(
            UserId::random(),
            email,
            name,
            password_hash,
            UserFlags::default(),
        );
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "account registered");
        Ok(user)
    }

    async fn issue_token(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let Ok(email) = Email::parse(credentials.email()) else {
            return Err(bad_credentials());
        };
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            return Err(bad_credentials());
        };
        let user_id = *user.id();
        if !self
            .verify(user, credentials.password().to_owned())
            .await?
        {
            return Err(bad_credentials());
        }

        let token = AuthToken::generate();
        self.tokens
            .store(&user_id, &token.digest())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %user_id, "api token issued");
        Ok(token)
    }

    async fn authenticate_token(&self, raw_token: &str) -> Result<User, Error> {
        let Some(token) = AuthToken::parse(raw_token) else {
            warn!("malformed api token presented");
            return Err(Error::unauthorized("Invalid token."));
        };
        let user_id = self
            .tokens
            .find_user(&token.digest())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("Invalid token."))?;
        match self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
        {
            Some(user) if user.is_active() => Ok(user),
            _ => Err(Error::unauthorized("User inactive or deleted.")),
        }
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, Error> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let ProfileUpdate {
            email,
            password,
            name,
        } = update;
        if let Some(new_email) = email {
            user.set_email(new_email);
        }
        if let Some(new_name) = name {
            user.set_name(new_name);
        }
        if let Some(new_password) = password {
            let hash = self.hash(new_password.expose().to_owned()).await?;
            user.set_password_hash(hash);
        }

        self.users.update(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "profile updated");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
