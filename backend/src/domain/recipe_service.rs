//! Recipe use-cases.
//!
//! The service owns the rules that span repositories: label references must
//! name labels of the right kind owned by the caller, and uploaded images are
//! validated and stored before the recipe row points at them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::label_service::map_label_error;
use crate::domain::ports::{
    ImageStore, ImageStoreError, ImageUpload, LabelRepository, RecipeCatalogue,
    RecipePersistenceError, RecipeRepository,
};
use crate::domain::{
    Error, FieldError, ImagePath, Label, LabelId, LabelKind, Recipe, RecipeDetail, RecipeDraft, RecipeId,
    RecipePatch, RecipeQuery, UploadIdGenerator, UserId, recipe_image_file_path, validate_image,
};

fn map_recipe_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipePersistenceError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn map_store_error(error: ImageStoreError) -> Error {
    Error::internal(error.to_string())
}

fn recipe_not_found() -> Error {
    Error::not_found("recipe not found")
}

/// Recipe service implementing [`RecipeCatalogue`].
pub struct RecipeService<R: ?Sized, L: ?Sized, S: ?Sized> {
    recipes: Arc<R>,
    labels: Arc<L>,
    images: Arc<S>,
    upload_ids: Arc<dyn UploadIdGenerator>,
}

impl<R: ?Sized, L: ?Sized, S: ?Sized> RecipeService<R, L, S> {
    /// Wire the repositories, image store and upload name source.
    #[must_use]
    pub fn new(
        recipes: Arc<R>,
        labels: Arc<L>,
        images: Arc<S>,
        upload_ids: Arc<dyn UploadIdGenerator>,
    ) -> Self {
        Self {
            recipes,
            labels,
            images,
            upload_ids,
        }
    }
}

impl<R, L, S> RecipeService<R, L, S>
where
    R: RecipeRepository + ?Sized,
    L: LabelRepository + ?Sized,
    S: ImageStore + ?Sized,
{
    async fn owned_labels(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut found = self
            .labels
            .find_many(owner, kind, ids)
            .await
            .map_err(map_label_error)?;
        found.sort_by_key(|label| label.id);
        Ok(found)
    }

    /// Reject references to labels the owner does not have.
    async fn check_references(&self, owner: &UserId, draft: &RecipeDraft) -> Result<(), Error> {
        let mut errors = Vec::new();
        for (kind, ids) in [
            (LabelKind::Tag, &draft.tags),
            (LabelKind::Ingredient, &draft.ingredients),
        ] {
            let found = self.owned_labels(owner, kind, ids).await?;
            if let Some(missing) = ids
                .iter()
                .find(|id| !found.iter().any(|label| label.id == **id))
            {
                errors.push(FieldError::new(
                    kind.recipe_field(),
                    "does_not_exist",
                    format!("Invalid pk \"{missing}\" - object does not exist."),
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(errors))
        }
    }

    async fn find(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)
    }

    async fn store_update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error> {
        self.check_references(owner, &draft).await?;
        let recipe = self
            .recipes
            .update(owner, id, &draft)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)?;
        info!(recipe_id = %recipe.id, "recipe updated");
        Ok(recipe)
    }

    async fn discard_image(&self, recipe: &Recipe) {
        if let Some(path) = &recipe.image {
            self.remove_file(path, recipe.id).await;
        }
    }

    async fn remove_file(&self, path: &ImagePath, recipe_id: RecipeId) {
        if let Err(error) = self.images.remove(path).await {
            warn!(%error, %recipe_id, image = path.as_str(), "failed to remove recipe image");
        }
    }
}

#[async_trait]
impl<R, L, S> RecipeCatalogue for RecipeService<R, L, S>
where
    R: RecipeRepository + ?Sized,
    L: LabelRepository + ?Sized,
    S: ImageStore + ?Sized,
{
    async fn list(&self, owner: &UserId, query: &RecipeQuery) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(owner, query)
            .await
            .map_err(map_recipe_error)
    }

    async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        let normalised = draft.normalised();
        self.check_references(owner, &normalised).await?;
        let recipe = self
            .recipes
            .create(owner, &normalised)
            .await
            .map_err(map_recipe_error)?;
        info!(recipe_id = %recipe.id, "recipe created");
        Ok(recipe)
    }

    async fn detail(&self, owner: &UserId, id: RecipeId) -> Result<RecipeDetail, Error> {
        let recipe = self.find(owner, id).await?;
        let tags = self.owned_labels(owner, LabelKind::Tag, &recipe.tags).await?;
        let ingredients = self
            .owned_labels(owner, LabelKind::Ingredient, &recipe.ingredients)
            .await?;
        Ok(RecipeDetail {
            recipe,
            tags,
            ingredients,
        })
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error> {
        self.find(owner, id).await?;
        self.store_update(owner, id, draft.normalised()).await
    }

    async fn patch(
        &self,
        owner: &UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, Error> {
        let current = self.find(owner, id).await?;
        self.store_update(owner, id, patch.apply_to(&current)).await
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let recipe = self.find(owner, id).await?;
        if !self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?
        {
            return Err(recipe_not_found());
        }
        self.discard_image(&recipe).await;
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }

    async fn upload_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, Error> {
        let previous = self.find(owner, id).await?;
        let format = validate_image(&upload.bytes).map_err(|err| {
            Error::validation(vec![FieldError::new("image", "invalid_image", err.to_string())])
        })?;

        let path = recipe_image_file_path(&upload.file_name, format, self.upload_ids.as_ref());
        self.images
            .save(&path, &upload.bytes)
            .await
            .map_err(map_store_error)?;
        let linked = self
            .recipes
            .set_image(owner, id, &path)
            .await
            .map_err(map_recipe_error)
            .and_then(|found| found.ok_or_else(recipe_not_found));
        let recipe = match linked {
            Ok(recipe) => recipe,
            Err(error) => {
                self.remove_file(&path, id).await;
                return Err(error);
            }
        };

        if previous.image.as_ref() != Some(&path) {
            self.discard_image(&previous).await;
        }
        info!(recipe_id = %id, image = path.as_str(), "recipe image stored");
        Ok(recipe)
    }

    fn image_url(&self, recipe: &Recipe) -> Option<String> {
        recipe.image.as_ref().map(|path| self.images.url(path))
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
