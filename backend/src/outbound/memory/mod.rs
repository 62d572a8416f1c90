//! In-process adapter for every persistence port.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! All tables live behind one mutex so each operation is atomic; list
//! narrowing reuses the domain filters in [`crate::domain::access`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::access::{filter_labels, filter_recipes};
use crate::domain::ports::{
    LabelPersistenceError, LabelRepository, RecipePersistenceError, RecipeRepository,
    TokenPersistenceError, TokenRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, ImagePath, Label, LabelId, LabelKind, LabelName, LabelQuery, Recipe, RecipeDraft,
    RecipeId, RecipeQuery, TokenDigest, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tokens: HashMap<TokenDigest, UserId>,
    labels: Vec<Label>,
    recipes: Vec<Recipe>,
    last_label_id: i64,
    last_recipe_id: i64,
}

impl Tables {
    fn owned_recipes(&self, owner: &UserId) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.owner == *owner)
            .cloned()
            .collect()
    }

    fn recipe_mut(&mut self, owner: &UserId, id: RecipeId) -> Option<&mut Recipe> {
        self.recipes
            .iter_mut()
            .find(|recipe| recipe.id == id && recipe.owner == *owner)
    }
}

/// Mutex-guarded tables implementing the user, token, label and recipe
/// repositories.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Empty store with both id counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, &'static str> {
        self.tables.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.users.iter().any(|u| u.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_str()));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables
            .users
            .iter()
            .any(|u| u.email() == user.email() && u.id() != user.id())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_str()));
        }
        match tables.users.iter_mut().find(|u| u.id() == user.id()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user does not exist")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.iter().find(|u| u.email() == email).cloned())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn store(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
    ) -> Result<(), TokenPersistenceError> {
        let mut tables = self.lock().map_err(TokenPersistenceError::query)?;
        tables.tokens.insert(digest.clone(), *user_id);
        Ok(())
    }

    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, TokenPersistenceError> {
        let tables = self.lock().map_err(TokenPersistenceError::query)?;
        Ok(tables.tokens.get(digest).copied())
    }
}

#[async_trait]
impl LabelRepository for InMemoryStore {
    async fn create(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: &LabelName,
    ) -> Result<Label, LabelPersistenceError> {
        let mut tables = self.lock().map_err(LabelPersistenceError::query)?;
        tables.last_label_id += 1;
        let label = Label {
            id: LabelId::new(tables.last_label_id),
            kind,
            owner: *owner,
            name: name.clone(),
        };
        tables.labels.push(label.clone());
        Ok(label)
    }

    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        query: LabelQuery,
    ) -> Result<Vec<Label>, LabelPersistenceError> {
        let tables = self.lock().map_err(LabelPersistenceError::query)?;
        let scoped = tables
            .labels
            .iter()
            .filter(|label| label.owner == *owner && label.kind == kind)
            .cloned()
            .collect();
        Ok(filter_labels(scoped, &tables.owned_recipes(owner), query))
    }

    async fn find_many(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, LabelPersistenceError> {
        let tables = self.lock().map_err(LabelPersistenceError::query)?;
        Ok(tables
            .labels
            .iter()
            .filter(|label| label.owner == *owner && label.kind == kind && ids.contains(&label.id))
            .cloned()
            .collect())
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelPersistenceError> {
        let mut tables = self.lock().map_err(LabelPersistenceError::query)?;
        Ok(tables
            .labels
            .iter_mut()
            .find(|label| label.id == id && label.owner == *owner && label.kind == kind)
            .map(|label| {
                label.name = name.clone();
                label.clone()
            }))
    }
}

fn apply_draft(recipe: &mut Recipe, draft: &RecipeDraft) {
    recipe.title = draft.title.clone();
    recipe.time_minutes = draft.time_minutes;
    recipe.price = draft.price;
    recipe.link = draft.link.clone();
    recipe.tags = draft.tags.clone();
    recipe.ingredients = draft.ingredients.clone();
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipePersistenceError> {
        let mut tables = self.lock().map_err(RecipePersistenceError::query)?;
        tables.last_recipe_id += 1;
        let recipe = Recipe {
            id: RecipeId::new(tables.last_recipe_id),
            owner: *owner,
            title: draft.title.clone(),
            time_minutes: draft.time_minutes,
            price: draft.price,
            link: draft.link.clone(),
            tags: draft.tags.clone(),
            ingredients: draft.ingredients.clone(),
            image: None,
        };
        tables.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn list(
        &self,
        owner: &UserId,
        query: &RecipeQuery,
    ) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let tables = self.lock().map_err(RecipePersistenceError::query)?;
        Ok(filter_recipes(tables.owned_recipes(owner), query))
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let tables = self.lock().map_err(RecipePersistenceError::query)?;
        Ok(tables
            .recipes
            .iter()
            .find(|recipe| recipe.id == id && recipe.owner == *owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut tables = self.lock().map_err(RecipePersistenceError::query)?;
        Ok(tables.recipe_mut(owner, id).map(|recipe| {
            apply_draft(recipe, draft);
            recipe.clone()
        }))
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut tables = self.lock().map_err(RecipePersistenceError::query)?;
        let before = tables.recipes.len();
        tables
            .recipes
            .retain(|recipe| !(recipe.id == id && recipe.owner == *owner));
        Ok(tables.recipes.len() != before)
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &ImagePath,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut tables = self.lock().map_err(RecipePersistenceError::query)?;
        Ok(tables.recipe_mut(owner, id).map(|recipe| {
            recipe.image = Some(image.clone());
            recipe.clone()
        }))
    }
}
