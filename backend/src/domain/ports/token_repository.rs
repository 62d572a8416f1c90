//! Driven port for API token persistence.
use async_trait::async_trait;

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum TokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Stores token digests against the account they authenticate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Record a newly issued token.
    async fn store(&self, user_id: &UserId, digest: &TokenDigest)
    -> Result<(), TokenPersistenceError>;

    /// Resolve the account owning a token digest.
    async fn find_user(&self, digest: &TokenDigest)
    -> Result<Option<UserId>, TokenPersistenceError>;
}
