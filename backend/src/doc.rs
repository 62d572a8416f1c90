//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the request and
//! response DTOs, and the `TokenAuth` security scheme (`Authorization:
//! Token <key>`). The document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump`.

use crate::domain::{Error, ErrorCode, FieldError};
use crate::inbound::http::labels::{LabelRequest, LabelResponse};
use crate::inbound::http::recipe_images::{ImageUploadForm, RecipeImageResponse};
use crate::inbound::http::recipes::{RecipeDetailResponse, RecipeRequest, RecipeResponse};
use crate::inbound::http::users::{
    ProfileRequest, RegisterRequest, TokenRequest, TokenResponse, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme referenced by handlers.
pub const TOKEN_AUTH: &str = "TokenAuth";

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_AUTH,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` where the key comes from POST /api/v1/users/token.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe catalogue API",
        description = "Token-authenticated access to personal recipes, tags and ingredients.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::issue_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::labels::list_tags,
        crate::inbound::http::labels::create_tag,
        crate::inbound::http::labels::rename_tag,
        crate::inbound::http::labels::list_ingredients,
        crate::inbound::http::labels::create_ingredient,
        crate::inbound::http::labels::rename_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipe_images::upload_recipe_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FieldError,
        RegisterRequest,
        TokenRequest,
        TokenResponse,
        ProfileRequest,
        UserResponse,
        LabelRequest,
        LabelResponse,
        RecipeRequest,
        RecipeResponse,
        RecipeDetailResponse,
        ImageUploadForm,
        RecipeImageResponse,
    )),
    tags(
        (name = "users", description = "Registration, tokens and the caller's profile"),
        (name = "tags", description = "The caller's recipe tags"),
        (name = "ingredients", description = "The caller's ingredients"),
        (name = "recipes", description = "The caller's recipes and their images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
