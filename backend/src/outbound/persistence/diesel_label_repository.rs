//! PostgreSQL-backed [`LabelRepository`] for tags and ingredients.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LabelPersistenceError, LabelRepository};
use crate::domain::{Label, LabelId, LabelKind, LabelName, LabelQuery, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LabelRow, NewLabelRow};
use super::pool::{DbPool, PoolError};
use super::schema::{labels, recipe_labels};

/// Diesel-backed label repository.
#[derive(Clone)]
pub struct DieselLabelRepository {
    pool: DbPool,
}

impl DieselLabelRepository {
    /// Repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LabelPersistenceError {
    map_basic_pool_error(error, LabelPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LabelPersistenceError {
    map_basic_diesel_error(
        error,
        LabelPersistenceError::query,
        LabelPersistenceError::connection,
    )
}

fn row_to_label(row: LabelRow) -> Result<Label, LabelPersistenceError> {
    let kind = LabelKind::from_stored(&row.kind).ok_or_else(|| {
        LabelPersistenceError::query(format!("unknown label kind \"{}\"", row.kind))
    })?;
    let name = LabelName::new(&row.name)
        .map_err(|err| LabelPersistenceError::query(format!("stored label name invalid: {err}")))?;
    Ok(Label {
        id: LabelId::new(row.id),
        kind,
        owner: UserId::from_uuid(row.user_id),
        name,
    })
}

fn rows_to_labels(rows: Vec<LabelRow>) -> Result<Vec<Label>, LabelPersistenceError> {
    rows.into_iter().map(row_to_label).collect()
}

fn raw_ids(ids: &[LabelId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl LabelRepository for DieselLabelRepository {
    async fn create(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: &LabelName,
    ) -> Result<Label, LabelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLabelRow {
            user_id: *owner.as_uuid(),
            kind: kind.as_str(),
            name: name.as_str(),
        };
        let stored: LabelRow = diesel::insert_into(labels::table)
            .values(&row)
            .returning(LabelRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_label(stored)
    }

    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        query: LabelQuery,
    ) -> Result<Vec<Label>, LabelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut select = labels::table
            .filter(labels::user_id.eq(owner.as_uuid()))
            .filter(labels::kind.eq(kind.as_str()))
            .select(LabelRow::as_select())
            .order_by((labels::name.desc(), labels::id.desc()))
            .into_boxed();
        if query.assigned_only {
            select = select.filter(
                labels::id.eq_any(recipe_labels::table.select(recipe_labels::label_id)),
            );
        }
        let rows: Vec<LabelRow> = select.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_labels(rows)
    }

    async fn find_many(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, LabelPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LabelRow> = labels::table
            .filter(labels::user_id.eq(owner.as_uuid()))
            .filter(labels::kind.eq(kind.as_str()))
            .filter(labels::id.eq_any(raw_ids(ids)))
            .select(LabelRow::as_select())
            .order_by(labels::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_labels(rows)
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<LabelRow> = diesel::update(
            labels::table
                .filter(labels::id.eq(id.get()))
                .filter(labels::user_id.eq(owner.as_uuid()))
                .filter(labels::kind.eq(kind.as_str())),
        )
        .set(labels::name.eq(name.as_str()))
        .returning(LabelRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        stored.map(row_to_label).transpose()
    }
}
