//! Repository fixtures over a freshly migrated embedded PostgreSQL database.

use std::str::FromStr;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use recipe_backend::domain::ports::{LabelRepository, RecipeRepository, UserRepository};
use recipe_backend::domain::{
    CookingTime, CredentialHasher, Label, LabelKind, LabelName, Price, Recipe, RecipeDraft,
    RecipeLink, RecipeTitle, User, UserId,
};
use recipe_backend::outbound::persistence::{
    DbPool, DieselLabelRepository, DieselRecipeRepository, DieselUserRepository, PoolConfig,
};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

use crate::cluster_skip::handle_cluster_setup_failure;
use crate::embedded_postgres::{provision_template_database, shared_cluster};

/// Diesel repositories sharing one throwaway database.
pub struct DieselWorld {
    /// Runtime driving the async repositories from sync tests.
    pub runtime: Runtime,
    pub users: DieselUserRepository,
    pub labels: DieselLabelRepository,
    pub recipes: DieselRecipeRepository,
    _database: TemporaryDatabase,
}

fn setup() -> Result<DieselWorld, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;

    let config = PoolConfig::new(database.url().to_string())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(DieselWorld {
        runtime,
        users: DieselUserRepository::new(pool.clone()),
        labels: DieselLabelRepository::new(pool.clone()),
        recipes: DieselRecipeRepository::new(pool),
        _database: database,
    })
}

/// Build the world, or skip when the cluster is unavailable and optional.
pub fn diesel_world() -> Option<DieselWorld> {
    match setup() {
        Ok(world) => Some(world),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

impl DieselWorld {
    /// Persist a fresh account; labels and recipes reference it by key.
    pub fn user(&self, email: &str) -> UserId {
        let user = User::create_user(Some(email), "testpass123", "", &CredentialHasher::fast())
            .expect("valid account");
        self.runtime
            .block_on(self.users.insert(&user))
            .expect("insert user");
        *user.id()
    }

    pub fn label(&self, owner: &UserId, kind: LabelKind, name: &str) -> Label {
        let name = LabelName::new(name).expect("label name");
        self.runtime
            .block_on(self.labels.create(owner, kind, &name))
            .expect("create label")
    }

    pub fn recipe(&self, owner: &UserId, draft: &RecipeDraft) -> Recipe {
        self.runtime
            .block_on(self.recipes.create(owner, draft))
            .expect("create recipe")
    }
}

/// A valid draft linking the given labels.
pub fn draft(title: &str, tags: &[&Label], ingredients: &[&Label]) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new(title).expect("title"),
        time_minutes: CookingTime::new(5).expect("time"),
        price: Price::new(Decimal::from_str("5.25").expect("decimal")).expect("price"),
        link: RecipeLink::parse("https://example.com/recipe.pdf").expect("link"),
        tags: tags.iter().map(|label| label.id).collect(),
        ingredients: ingredients.iter().map(|label| label.id).collect(),
    }
    .normalised()
}
