//! Tag and ingredient use-cases.
//!
//! One service serves both collections; the [`LabelKind`] passed by the
//! caller selects which one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{LabelCatalogue, LabelPersistenceError, LabelRepository};
use crate::domain::{Error, Label, LabelId, LabelKind, LabelName, LabelQuery, UserId};

pub(crate) fn map_label_error(error: LabelPersistenceError) -> Error {
    match error {
        LabelPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("label repository unavailable: {message}"))
        }
        LabelPersistenceError::Query { message } => {
            Error::internal(format!("label repository error: {message}"))
        }
    }
}

/// Label service implementing [`LabelCatalogue`].
pub struct LabelService<L: ?Sized> {
    labels: Arc<L>,
}

impl<L: ?Sized> LabelService<L> {
    /// Serve labels from `labels`.
    #[must_use]
    pub const fn new(labels: Arc<L>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl<L> LabelCatalogue for LabelService<L>
where
    L: LabelRepository + ?Sized,
{
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        query: LabelQuery,
    ) -> Result<Vec<Label>, Error> {
        self.labels
            .list(owner, kind, query)
            .await
            .map_err(map_label_error)
    }

    async fn create(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: LabelName,
    ) -> Result<Label, Error> {
        let label = self
            .labels
            .create(owner, kind, &name)
            .await
            .map_err(map_label_error)?;
        info!(label_id = %label.id, %kind, "label created");
        Ok(label)
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: LabelName,
    ) -> Result<Label, Error> {
        self.labels
            .rename(owner, kind, id, &name)
            .await
            .map_err(map_label_error)?
            .ok_or_else(|| Error::not_found(format!("{kind} not found")))
    }
}
