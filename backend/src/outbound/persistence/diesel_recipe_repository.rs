//! PostgreSQL-backed [`RecipeRepository`].
//!
//! Recipe rows and their label links are written in one transaction. Reads
//! load the links for every returned recipe in a second query.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipePersistenceError, RecipeRepository};
use crate::domain::{
    CookingTime, ImagePath, LabelId, LabelKind, Price, Recipe, RecipeDraft, RecipeId, RecipeLink,
    RecipeQuery, RecipeTitle, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRecipeRow, RecipeChanges, RecipeLabelRow, RecipeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{labels, recipe_labels, recipes};

/// Diesel-backed recipe repository.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipePersistenceError {
    map_basic_pool_error(error, RecipePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipePersistenceError {
    map_basic_diesel_error(
        error,
        RecipePersistenceError::query,
        RecipePersistenceError::connection,
    )
}

/// Label ids linked to one recipe, split by kind.
#[derive(Debug, Default)]
struct Links {
    tags: Vec<LabelId>,
    ingredients: Vec<LabelId>,
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> RecipePersistenceError {
    RecipePersistenceError::query(format!("stored {what} invalid: {err}"))
}

fn row_to_recipe(row: RecipeRow, links: Links) -> Result<Recipe, RecipePersistenceError> {
    Ok(Recipe {
        id: RecipeId::new(row.id),
        owner: UserId::from_uuid(row.user_id),
        title: RecipeTitle::new(&row.title).map_err(|err| corrupt("title", err))?,
        time_minutes: CookingTime::new(i64::from(row.time_minutes))
            .map_err(|err| corrupt("cooking time", err))?,
        price: Price::new(row.price).map_err(|err| corrupt("price", err))?,
        link: RecipeLink::parse(&row.link).map_err(|err| corrupt("link", err))?,
        tags: links.tags,
        ingredients: links.ingredients,
        image: row.image.map(ImagePath::from_stored),
    })
}

fn link_rows(recipe_id: i64, draft: &RecipeDraft) -> Vec<RecipeLabelRow> {
    draft
        .tags
        .iter()
        .chain(draft.ingredients.iter())
        .map(|label| RecipeLabelRow {
            recipe_id,
            label_id: label.get(),
        })
        .collect()
}

async fn insert_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> Result<(), diesel::result::Error> {
    let rows = link_rows(recipe_id, draft);
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(recipe_labels::table)
        .values(rows)
        .execute(conn)
        .await
        .map(|_| ())
}

fn link_text(draft: &RecipeDraft) -> &str {
    draft.link.as_ref().map_or("", RecipeLink::as_str)
}

/// Load the label links for `recipe_ids`, ordered by label id.
async fn load_links(
    conn: &mut AsyncPgConnection,
    recipe_ids: Vec<i64>,
) -> Result<HashMap<i64, Links>, diesel::result::Error> {
    let rows: Vec<(i64, i64, String)> = recipe_labels::table
        .inner_join(labels::table)
        .filter(recipe_labels::recipe_id.eq_any(recipe_ids))
        .select((recipe_labels::recipe_id, labels::id, labels::kind))
        .order_by(labels::id)
        .load(conn)
        .await?;

    let mut links: HashMap<i64, Links> = HashMap::new();
    for (recipe_id, label_id, kind) in rows {
        let entry = links.entry(recipe_id).or_default();
        match LabelKind::from_stored(&kind) {
            Some(LabelKind::Tag) => entry.tags.push(LabelId::new(label_id)),
            Some(LabelKind::Ingredient) => entry.ingredients.push(LabelId::new(label_id)),
            None => tracing::warn!(label_id, kind = %kind, "skipping link to label of unknown kind"),
        }
    }
    Ok(links)
}

/// Ids of recipes linked to any of `ids` of the given kind.
async fn recipes_linked_to(
    conn: &mut AsyncPgConnection,
    kind: LabelKind,
    ids: &[LabelId],
) -> Result<Vec<i64>, diesel::result::Error> {
    recipe_labels::table
        .inner_join(labels::table)
        .filter(labels::kind.eq(kind.as_str()))
        .filter(recipe_labels::label_id.eq_any(ids.iter().map(|id| id.get()).collect::<Vec<_>>()))
        .select(recipe_labels::recipe_id)
        .distinct()
        .load(conn)
        .await
}

async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipePersistenceError> {
    let mut links = load_links(conn, rows.iter().map(|row| row.id).collect())
        .await
        .map_err(map_diesel_error)?;
    rows.into_iter()
        .map(|row| {
            let recipe_links = links.remove(&row.id).unwrap_or_default();
            row_to_recipe(row, recipe_links)
        })
        .collect()
}

async fn assemble_one(
    conn: &mut AsyncPgConnection,
    row: Option<RecipeRow>,
) -> Result<Option<Recipe>, RecipePersistenceError> {
    match row {
        Some(found) => Ok(assemble(conn, vec![found]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewRecipeRow {
            user_id: *owner.as_uuid(),
            title: draft.title.as_str(),
            time_minutes: draft.time_minutes.minutes(),
            price: draft.price.value(),
            link: link_text(draft),
        };

        let row: RecipeRow = conn
            .transaction(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    insert_links(conn, row.id, draft).await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_recipe(
            row,
            Links {
                tags: draft.tags.clone(),
                ingredients: draft.ingredients.clone(),
            },
        )
    }

    async fn list(
        &self,
        owner: &UserId,
        query: &RecipeQuery,
    ) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut select = recipes::table
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .select(RecipeRow::as_select())
            .order_by(recipes::id.desc())
            .into_boxed();

        for (kind, wanted) in [
            (LabelKind::Tag, query.tags.as_deref()),
            (LabelKind::Ingredient, query.ingredients.as_deref()),
        ] {
            if let Some(ids) = wanted {
                let matching = recipes_linked_to(&mut conn, kind, ids)
                    .await
                    .map_err(map_diesel_error)?;
                select = select.filter(recipes::id.eq_any(matching));
            }
        }

        let rows: Vec<RecipeRow> = select.load(&mut conn).await.map_err(map_diesel_error)?;
        assemble(&mut conn, rows).await
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id.get()))
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        assemble_one(&mut conn, row).await
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = RecipeChanges {
            title: draft.title.as_str(),
            time_minutes: draft.time_minutes.minutes(),
            price: draft.price.value(),
            link: link_text(draft),
        };
        let owner_id = *owner.as_uuid();

        let row: Option<RecipeRow> = conn
            .transaction(|conn| {
                async move {
                    let updated: Option<RecipeRow> = diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id.get()))
                            .filter(recipes::user_id.eq(owner_id)),
                    )
                    .set(&changes)
                    .returning(RecipeRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    let Some(row) = updated else {
                        return Ok(None);
                    };
                    diesel::delete(recipe_labels::table.filter(recipe_labels::recipe_id.eq(row.id)))
                        .execute(conn)
                        .await?;
                    insert_links(conn, row.id, draft).await?;
                    Ok::<_, diesel::result::Error>(Some(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(|found| {
            row_to_recipe(
                found,
                Links {
                    tags: draft.tags.clone(),
                    ingredients: draft.ingredients.clone(),
                },
            )
        })
        .transpose()
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &ImagePath,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = diesel::update(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(owner.as_uuid())),
        )
        .set(recipes::image.eq(Some(image.as_str())))
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        assemble_one(&mut conn, row).await
    }
}
