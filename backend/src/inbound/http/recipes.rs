//! Recipe endpoints.
//!
//! ```text
//! GET    /api/v1/recipes?tags=1,2&ingredients=3
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PUT    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! ```
//!
//! Listings and write responses reference labels by id; the detail view
//! inlines them together with the image URL.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CookingTime, Error, LabelId, Price, Recipe, RecipeDetail, RecipeDraft, RecipeId, RecipeLink,
    RecipePatch, RecipeQuery, RecipeTitle,
};

use super::ApiResult;
use super::auth::Authenticated;
use super::labels::LabelResponse;
use super::state::HttpState;
use super::validation::{FieldErrors, finish_fields, nullable};

/// Query parameters accepted by the recipe listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    /// Comma-separated tag ids; a recipe must carry at least one.
    #[param(example = "1,2")]
    pub tags: Option<String>,
    /// Comma-separated ingredient ids; a recipe must use at least one.
    #[param(example = "3")]
    pub ingredients: Option<String>,
}

/// Body for create, replace and partial update.
///
/// Create and replace require `title`, `time_minutes` and `price`; partial
/// updates change only what is present. Only `link` accepts `null`, which
/// clears it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecipeRequest {
    /// Recipe title.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, example = "Chocolate cheesecake")]
    pub title: Option<Option<String>>,
    /// Preparation time in minutes.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>, example = 30)]
    pub time_minutes: Option<Option<i64>>,
    /// Price with at most two decimal places.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, example = "5.00")]
    pub price: Option<Option<Decimal>>,
    /// External link; blank or `null` means none.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable, example = "https://example.com/recipe.pdf")]
    pub link: Option<Option<String>>,
    /// Tag ids owned by the caller.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Vec<i64>>)]
    pub tags: Option<Option<Vec<i64>>>,
    /// Ingredient ids owned by the caller.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Vec<i64>>)]
    pub ingredients: Option<Option<Vec<i64>>>,
}

/// List and write representation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    /// Recipe id.
    pub id: i64,
    /// Recipe title.
    pub title: String,
    /// Preparation time in minutes.
    pub time_minutes: i32,
    /// Price with two decimal places.
    #[schema(example = "5.00")]
    pub price: String,
    /// External link, empty when unset.
    pub link: String,
    /// Tag ids, ascending.
    pub tags: Vec<i64>,
    /// Ingredient ids, ascending.
    pub ingredients: Vec<i64>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_str().to_owned(),
            time_minutes: recipe.time_minutes.minutes(),
            price: recipe.price.to_string(),
            link: link_text(recipe),
            tags: recipe.tags.iter().map(|id| id.get()).collect(),
            ingredients: recipe.ingredients.iter().map(|id| id.get()).collect(),
        }
    }
}

/// Detail representation with labels inlined.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeDetailResponse {
    /// Recipe id.
    pub id: i64,
    /// Recipe title.
    pub title: String,
    /// Preparation time in minutes.
    pub time_minutes: i32,
    /// Price with two decimal places.
    #[schema(example = "5.00")]
    pub price: String,
    /// External link, empty when unset.
    pub link: String,
    /// Tags, ascending by id.
    pub tags: Vec<LabelResponse>,
    /// Ingredients, ascending by id.
    pub ingredients: Vec<LabelResponse>,
    /// Public image URL, `null` when no image was uploaded.
    pub image: Option<String>,
}

impl RecipeDetailResponse {
    fn new(detail: &RecipeDetail, image: Option<String>) -> Self {
        let recipe = &detail.recipe;
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_str().to_owned(),
            time_minutes: recipe.time_minutes.minutes(),
            price: recipe.price.to_string(),
            link: link_text(recipe),
            tags: detail.tags.iter().map(LabelResponse::from).collect(),
            ingredients: detail.ingredients.iter().map(LabelResponse::from).collect(),
            image,
        }
    }
}

fn link_text(recipe: &Recipe) -> String {
    recipe
        .link
        .as_ref()
        .map(|link| link.as_str().to_owned())
        .unwrap_or_default()
}

fn label_ids(raw: Vec<i64>) -> Vec<LabelId> {
    raw.into_iter().map(LabelId::new).collect()
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = Error;

    fn try_from(body: RecipeRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let (title, time_minutes, price, link, tags, ingredients) = finish_fields!(
            errors,
            title = errors.require_non_null("title", body.title, |raw| RecipeTitle::new(&raw)),
            time_minutes =
                errors.require_non_null("time_minutes", body.time_minutes, CookingTime::new),
            price = errors.require_non_null("price", body.price, Price::new),
            link = errors
                .optional("link", body.link.flatten().as_deref(), RecipeLink::parse)
                .map(Option::flatten),
            tags = errors.non_null("tags", body.tags),
            ingredients = errors.non_null("ingredients", body.ingredients),
        );
        Ok(Self {
            title,
            time_minutes,
            price,
            link,
            tags: label_ids(tags.unwrap_or_default()),
            ingredients: label_ids(ingredients.unwrap_or_default()),
        })
    }
}

impl TryFrom<RecipeRequest> for RecipePatch {
    type Error = Error;

    fn try_from(body: RecipeRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let (title, time_minutes, price, link, tags, ingredients) = finish_fields!(
            errors,
            title = errors.optional_non_null("title", body.title, |raw| RecipeTitle::new(&raw)),
            time_minutes =
                errors.optional_non_null("time_minutes", body.time_minutes, CookingTime::new),
            price = errors.optional_non_null("price", body.price, Price::new),
            link = match body.link {
                None => Some(None),
                Some(raw) => errors
                    .optional("link", raw.as_deref(), RecipeLink::parse)
                    .map(|parsed| Some(parsed.flatten())),
            },
            tags = errors.non_null("tags", body.tags),
            ingredients = errors.non_null("ingredients", body.ingredients),
        );
        Ok(Self {
            title,
            time_minutes,
            price,
            link,
            tags: tags.map(label_ids),
            ingredients: ingredients.map(label_ids),
        })
    }
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Matching recipes", body = [RecipeResponse]),
        (status = 400, description = "Malformed id list", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<RecipeListParams>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let query = RecipeQuery::parse(params.tags.as_deref(), params.ingredients.as_deref())
        .map_err(Error::validation)?;
    let recipes = state.recipes.list(caller.id(), &query).await?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid fields or unknown labels", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let recipe = state.recipes.create(caller.id(), draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

/// Fetch one recipe with tags and ingredients inlined.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe detail", body = RecipeDetailResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such recipe for this user", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let detail = state
        .recipes
        .detail(caller.id(), RecipeId::new(path.into_inner()))
        .await?;
    let image = state.recipes.image_url(&detail.recipe);
    Ok(web::Json(RecipeDetailResponse::new(&detail, image)))
}

/// Replace every editable field of a recipe.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid fields or unknown labels", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such recipe for this user", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let draft = RecipeDraft::try_from(payload.into_inner())?;
    let recipe = state
        .recipes
        .replace(caller.id(), RecipeId::new(path.into_inner()), draft)
        .await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Change only the supplied fields of a recipe.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid fields or unknown labels", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such recipe for this user", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let patch = RecipePatch::try_from(payload.into_inner())?;
    let recipe = state
        .recipes
        .patch(caller.id(), RecipeId::new(path.into_inner()), patch)
        .await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Delete a recipe and its image.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such recipe for this user", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete(caller.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
