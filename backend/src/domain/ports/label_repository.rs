//! Driven port for tag and ingredient persistence.
//!
//! Every method is scoped to an owner and a [`LabelKind`]; adapters must never
//! return rows outside that scope.
use async_trait::async_trait;

use crate::domain::{Label, LabelId, LabelKind, LabelName, LabelQuery, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by label repository adapters.
    pub enum LabelPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "label repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "label repository query failed: {message}",
    }
}

/// Persistence for tags and ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync {
    /// Insert a label owned by `owner`.
    async fn create(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: &LabelName,
    ) -> Result<Label, LabelPersistenceError>;

    /// List the owner's labels of `kind`, narrowed and ordered per `query`.
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        query: LabelQuery,
    ) -> Result<Vec<Label>, LabelPersistenceError>;

    /// Fetch the subset of `ids` owned by `owner` with the given kind.
    async fn find_many(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, LabelPersistenceError>;

    /// Rename a label. Returns `None` when it is not in scope.
    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelPersistenceError>;
}
