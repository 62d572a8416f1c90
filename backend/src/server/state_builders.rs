//! Builders wiring driven adapters into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;

use recipe_backend::domain::ports::{
    ImageStore, LabelRepository, RecipeRepository, TokenRepository, UserRepository,
};
use recipe_backend::domain::{
    AccountService, CredentialHasher, LabelService, RecipeService, UuidUploadIds,
};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::persistence::{
    DieselLabelRepository, DieselRecipeRepository, DieselTokenRepository, DieselUserRepository,
};
use tracing::warn;

use super::ServerConfig;

/// Driven adapters for every repository port.
struct Repositories<U, T, L, R> {
    users: Arc<U>,
    tokens: Arc<T>,
    labels: Arc<L>,
    recipes: Arc<R>,
}

fn wire_services<U, T, L, R, S>(repos: Repositories<U, T, L, R>, images: Arc<S>) -> HttpState
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    L: LabelRepository + 'static,
    R: RecipeRepository + 'static,
    S: ImageStore + 'static,
{
    let Repositories {
        users,
        tokens,
        labels,
        recipes,
    } = repos;
    let accounts = AccountService::new(users, tokens, CredentialHasher::default());
    let label_service = LabelService::new(Arc::clone(&labels));
    let recipe_service = RecipeService::new(recipes, labels, images, Arc::new(UuidUploadIds));
    HttpState::new(
        Arc::new(accounts),
        Arc::new(label_service),
        Arc::new(recipe_service),
    )
}

/// Build handler state from the configured adapters.
///
/// Uses the Diesel repositories when a pool is configured and the in-memory
/// store otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let images = Arc::new(config.images.clone());
    let state = match &config.db_pool {
        Some(pool) => wire_services(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                tokens: Arc::new(DieselTokenRepository::new(pool.clone())),
                labels: Arc::new(DieselLabelRepository::new(pool.clone())),
                recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            },
            images,
        ),
        None => {
            warn!("no database configured; data lives in memory and is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            wire_services(
                Repositories {
                    users: Arc::clone(&store),
                    tokens: Arc::clone(&store),
                    labels: Arc::clone(&store),
                    recipes: store,
                },
                images,
            )
        }
    };
    web::Data::new(state)
}
