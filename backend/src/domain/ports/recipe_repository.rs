//! Driven port for recipe persistence.
//!
//! Operations are scoped to an owner. Label references in drafts have already
//! been checked against the owner's labels by the caller.
use async_trait::async_trait;

use crate::domain::{ImagePath, Recipe, RecipeDraft, RecipeId, RecipeQuery, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Persistence for recipes and their label links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe and its label links atomically.
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipePersistenceError>;

    /// List the owner's recipes narrowed by `query`, newest first.
    async fn list(
        &self,
        owner: &UserId,
        query: &RecipeQuery,
    ) -> Result<Vec<Recipe>, RecipePersistenceError>;

    /// Fetch one recipe in scope.
    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Replace a recipe's fields and label links atomically.
    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Delete a recipe. Returns whether a row was removed.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipePersistenceError>;

    /// Point a recipe at a stored image.
    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &ImagePath,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;
}
