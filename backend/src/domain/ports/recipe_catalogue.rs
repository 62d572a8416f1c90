//! Driving port for recipe use-cases.

use async_trait::async_trait;

use crate::domain::{
    Error, Recipe, RecipeDetail, RecipeDraft, RecipeId, RecipePatch, RecipeQuery, UserId,
};

/// An uploaded image file as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name the client sent; only a safe extension is kept.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Recipe use-cases, always scoped to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCatalogue: Send + Sync {
    /// Recipes visible to `owner`, narrowed by `query`.
    async fn list(&self, owner: &UserId, query: &RecipeQuery) -> Result<Vec<Recipe>, Error>;

    /// Create a recipe owned by `owner`.
    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Fetch one recipe with its labels inlined.
    async fn detail(&self, owner: &UserId, id: RecipeId) -> Result<RecipeDetail, Error>;

    /// Replace every editable field.
    async fn replace(&self, owner: &UserId, id: RecipeId, draft: RecipeDraft)
    -> Result<Recipe, Error>;

    /// Change only the supplied fields.
    async fn patch(&self, owner: &UserId, id: RecipeId, patch: RecipePatch)
    -> Result<Recipe, Error>;

    /// Remove a recipe.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;

    /// Validate, store and attach an image.
    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, Error>;

    /// Public URL for a stored image path.
    fn image_url(&self, recipe: &Recipe) -> Option<String>;
}
