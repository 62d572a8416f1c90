//! Tag and ingredient endpoints.
//!
//! Both collections share one set of handlers parameterised by
//! [`LabelKind`]; the routed functions below only pick the kind.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Label, LabelId, LabelKind, LabelName, LabelQuery};

use super::ApiResult;
use super::auth::Authenticated;
use super::state::HttpState;
use super::validation::{FieldErrors, finish_fields};

/// Query parameters accepted by label listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LabelListParams {
    /// Non-zero integer keeps only labels assigned to a recipe.
    #[param(example = "1")]
    pub assigned_only: Option<String>,
}

/// Create or rename body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LabelRequest {
    /// Label name.
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

/// Label representation, also inlined in recipe details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LabelResponse {
    /// Label id.
    pub id: i64,
    /// Label name.
    pub name: String,
}

impl From<&Label> for LabelResponse {
    fn from(label: &Label) -> Self {
        Self {
            id: label.id.get(),
            name: label.name.as_str().to_owned(),
        }
    }
}

impl TryFrom<LabelRequest> for LabelName {
    type Error = Error;

    fn try_from(body: LabelRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let (name,) = finish_fields!(
            errors,
            name = errors.require("name", body.name.as_deref(), Self::new),
        );
        Ok(name)
    }
}

async fn list_labels(
    state: &HttpState,
    caller: &Authenticated,
    kind: LabelKind,
    params: &LabelListParams,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    let query = LabelQuery::parse(params.assigned_only.as_deref())
        .map_err(|field| Error::validation(vec![field]))?;
    let labels = state.labels.list(caller.id(), kind, query).await?;
    Ok(web::Json(labels.iter().map(LabelResponse::from).collect()))
}

async fn create_label(
    state: &HttpState,
    caller: &Authenticated,
    kind: LabelKind,
    body: LabelRequest,
) -> ApiResult<HttpResponse> {
    let name = LabelName::try_from(body)?;
    let label = state.labels.create(caller.id(), kind, name).await?;
    Ok(HttpResponse::Created().json(LabelResponse::from(&label)))
}

async fn rename_label(
    state: &HttpState,
    caller: &Authenticated,
    kind: LabelKind,
    id: i64,
    body: LabelRequest,
) -> ApiResult<web::Json<LabelResponse>> {
    let name = LabelName::try_from(body)?;
    let label = state
        .labels
        .rename(caller.id(), kind, LabelId::new(id), name)
        .await?;
    Ok(web::Json(LabelResponse::from(&label)))
}

/// List the caller's tags.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    params(LabelListParams),
    responses(
        (status = 200, description = "Tags, newest name first", body = [LabelResponse]),
        (status = 400, description = "Malformed query", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<LabelListParams>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    list_labels(&state, &caller, LabelKind::Tag, &params).await
}

/// Create a tag.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Tag created", body = LabelResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<LabelRequest>,
) -> ApiResult<HttpResponse> {
    create_label(&state, &caller, LabelKind::Tag, payload.into_inner()).await
}

/// Rename one of the caller's tags.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Tag renamed", body = LabelResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such tag for this user", body = Error)
    ),
    tags = ["tags"],
    operation_id = "renameTag"
)]
#[patch("/tags/{id}")]
pub async fn rename_tag(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    rename_label(
        &state,
        &caller,
        LabelKind::Tag,
        path.into_inner(),
        payload.into_inner(),
    )
    .await
}

/// List the caller's ingredients.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(LabelListParams),
    responses(
        (status = 200, description = "Ingredients, newest name first", body = [LabelResponse]),
        (status = 400, description = "Malformed query", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<LabelListParams>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    list_labels(&state, &caller, LabelKind::Ingredient, &params).await
}

/// Create an ingredient.
#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Ingredient created", body = LabelResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient"
)]
#[post("/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<LabelRequest>,
) -> ApiResult<HttpResponse> {
    create_label(&state, &caller, LabelKind::Ingredient, payload.into_inner()).await
}

/// Rename one of the caller's ingredients.
#[utoipa::path(
    patch,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Ingredient renamed", body = LabelResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such ingredient for this user", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "renameIngredient"
)]
#[patch("/ingredients/{id}")]
pub async fn rename_ingredient(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    rename_label(
        &state,
        &caller,
        LabelKind::Ingredient,
        path.into_inner(),
        payload.into_inner(),
    )
    .await
}
