//! Recipe image upload.
//!
//! The body is `multipart/form-data` with one file field named `image`.
//! Decoding and storage are left to [`RecipeCatalogue::upload_image`]; this
//! handler only extracts the file.
//!
//! [`RecipeCatalogue::upload_image`]: crate::domain::ports::RecipeCatalogue::upload_image

use std::convert::Infallible;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::ImageUpload;
use crate::domain::{Error, FieldError, RecipeId};

use super::ApiResult;
use super::auth::Authenticated;
use super::state::HttpState;

/// Multipart field carrying the file.
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart form accepted by the upload endpoint.
#[derive(Debug, ToSchema)]
pub struct ImageUploadForm {
    /// Image file.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Upload result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeImageResponse {
    /// Recipe id.
    pub id: i64,
    /// Public URL of the stored image.
    pub image: Option<String>,
}

fn image_field_error(code: &str, message: &str) -> Error {
    Error::validation(vec![FieldError::new(IMAGE_FIELD, code, message)])
}

fn malformed(err: multer::Error) -> Error {
    debug!(error = %err, "malformed multipart body");
    Error::invalid_request(format!("Multipart form parse error - {err}"))
}

/// Pull the `image` file out of a buffered multipart body.
pub(crate) async fn read_image_field(
    content_type: Option<&str>,
    body: web::Bytes,
) -> Result<ImageUpload, Error> {
    let boundary = content_type
        .and_then(|value| multer::parse_boundary(value).ok())
        .ok_or_else(|| Error::invalid_request("Expected a multipart/form-data body."))?;
    let stream = futures_util::stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            return Err(image_field_error(
                "invalid",
                "The submitted data was not a file. Check the encoding type on the form.",
            ));
        };
        let bytes = field.bytes().await.map_err(malformed)?;
        return Ok(ImageUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
    Err(image_field_error("required", "No file was submitted."))
}

/// Attach an image to one of the caller's recipes.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/upload-image",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = RecipeImageResponse),
        (status = 400, description = "Missing or invalid image", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such recipe for this user", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipes/{id}/upload-image")]
pub async fn upload_recipe_image(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<RecipeImageResponse>> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let upload = read_image_field(content_type, body).await?;
    let recipe = state
        .recipes
        .upload_image(caller.id(), RecipeId::new(path.into_inner()), upload)
        .await?;
    Ok(web::Json(RecipeImageResponse {
        id: recipe.id.get(),
        image: state.recipes.image_url(&recipe),
    }))
}
