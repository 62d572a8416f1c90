//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] mounts the versioned API under `/api/v1`. The health probes
//! sit outside that prefix and are registered by the server alongside it.

pub mod auth;
pub mod error;
pub mod health;
pub mod labels;
pub mod recipe_images;
pub mod recipes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api/v1` scope with every account, label and recipe route.
///
/// Expects a `web::Data<HttpState>` registered on the application.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use recipe_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
            .app_data(web::PayloadConfig::new(recipe_images::MAX_UPLOAD_BYTES))
            .service(users::register)
            .service(users::issue_token)
            .service(users::current_user)
            .service(users::update_current_user)
            .service(labels::list_tags)
            .service(labels::create_tag)
            .service(labels::rename_tag)
            .service(labels::list_ingredients)
            .service(labels::create_ingredient)
            .service(labels::rename_ingredient)
            .service(recipes::list_recipes)
            .service(recipes::create_recipe)
            .service(recipes::get_recipe)
            .service(recipes::replace_recipe)
            .service(recipes::update_recipe)
            .service(recipes::delete_recipe)
            .service(recipe_images::upload_recipe_image),
    );
}
