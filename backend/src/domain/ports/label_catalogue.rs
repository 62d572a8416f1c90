//! Driving port for tag and ingredient use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Label, LabelId, LabelKind, LabelName, LabelQuery, UserId};

/// Tag and ingredient use-cases, always scoped to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelCatalogue: Send + Sync {
    /// Labels of `kind` visible to `owner`.
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        query: LabelQuery,
    ) -> Result<Vec<Label>, Error>;

    /// Create a label owned by `owner`.
    async fn create(&self, owner: &UserId, kind: LabelKind, name: LabelName)
    -> Result<Label, Error>;

    /// Rename one of the owner's labels.
    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: LabelName,
    ) -> Result<Label, Error>;
}
