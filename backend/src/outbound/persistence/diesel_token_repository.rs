//! PostgreSQL-backed [`TokenRepository`].
//!
//! Only token digests are stored; the raw value never reaches the database.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenPersistenceError, TokenRepository};
use crate::domain::{TokenDigest, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed token repository.
#[derive(Clone)]
pub struct DieselTokenRepository {
    pool: DbPool,
}

impl DieselTokenRepository {
    /// Repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenPersistenceError {
    map_basic_pool_error(error, TokenPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenPersistenceError {
    map_basic_diesel_error(
        error,
        TokenPersistenceError::query,
        TokenPersistenceError::connection,
    )
}

#[async_trait]
impl TokenRepository for DieselTokenRepository {
    async fn store(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
    ) -> Result<(), TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTokenRow {
            digest: digest.as_str(),
            user_id: *user_id.as_uuid(),
        };
        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .on_conflict(auth_tokens::digest)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id: Option<uuid::Uuid> = auth_tokens::table
            .find(digest.as_str())
            .select(auth_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(user_id.map(UserId::from_uuid))
    }
}
