//! Recipe image naming and content checks.

use image::ImageFormat;
use uuid::Uuid;

use super::ImagePath;

/// Directory, relative to the media root, holding recipe images.
pub const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";

/// Supplies the unique stem for uploaded file names.
#[cfg_attr(test, mockall::automock)]
pub trait UploadIdGenerator: Send + Sync {
    /// Return a stem no earlier call has returned.
    fn next_id(&self) -> String;
}

/// Random UUID v4 stems.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidUploadIds;

impl UploadIdGenerator for UuidUploadIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Longest extension kept from a client file name.
pub const EXTENSION_MAX_LEN: usize = 10;

/// Extension used when neither the client name nor the decoder offers one.
const FALLBACK_EXTENSION: &str = "img";

/// The extension of the client file name, when it is safe to reuse.
///
/// Only the final path segment counts. The extension is whatever follows its
/// last `.`, or the whole segment when there is no `.`, and is kept only when
/// it is ASCII alphanumeric and at most [`EXTENSION_MAX_LEN`] bytes.
fn client_extension(filename: &str) -> Option<&str> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let extension = base.rsplit('.').next().unwrap_or(base);
    let safe = !extension.is_empty()
        && extension.len() <= EXTENSION_MAX_LEN
        && extension.bytes().all(|byte| byte.is_ascii_alphanumeric());
    safe.then_some(extension)
}

/// Build the storage path for an uploaded recipe image.
///
/// The client's extension is reused when it is a short alphanumeric token;
/// otherwise the extension comes from the `detected` format of the payload.
///
/// # Examples
/// ```
/// use image::ImageFormat;
/// use recipe_backend::domain::{UploadIdGenerator, recipe_image_file_path};
///
/// struct Fixed;
/// impl UploadIdGenerator for Fixed {
///     fn next_id(&self) -> String { "test-uuid".to_owned() }
/// }
///
/// let path = recipe_image_file_path("myimage.jpg", ImageFormat::Jpeg, &Fixed);
/// assert_eq!(path.as_str(), "uploads/recipe/test-uuid.jpg");
///
/// let path = recipe_image_file_path("../../etc/passwd.", ImageFormat::Png, &Fixed);
/// assert_eq!(path.as_str(), "uploads/recipe/test-uuid.png");
/// ```
#[must_use]
pub fn recipe_image_file_path(
    filename: &str,
    detected: ImageFormat,
    ids: &dyn UploadIdGenerator,
) -> ImagePath {
    let extension = client_extension(filename)
        .or_else(|| detected.extensions_str().first().copied())
        .unwrap_or(FALLBACK_EXTENSION);
    ImagePath::from_stored(format!("{RECIPE_UPLOAD_DIR}/{}.{extension}", ids.next_id()))
}

/// Rejections for uploaded image payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    /// The upload carried no bytes.
    #[error("No file was submitted.")]
    Empty,
    #[error(
        "Upload a valid image. The file you uploaded was either not an image or a corrupted image."
    )]
    /// The bytes do not decode as a supported image.
    NotAnImage,
}

/// Confirm `bytes` decode as an image in a supported format.
///
/// Returns the detected format on success.
///
/// # Errors
/// [`ImageValidationError::Empty`] for an empty payload and
/// [`ImageValidationError::NotAnImage`] when decoding fails.
pub fn validate_image(bytes: &[u8]) -> Result<ImageFormat, ImageValidationError> {
    if bytes.is_empty() {
        return Err(ImageValidationError::Empty);
    }
    let format = image::guess_format(bytes).map_err(|_| ImageValidationError::NotAnImage)?;
    image::load_from_memory_with_format(bytes, format)
        .map(|_| format)
        .map_err(|_| ImageValidationError::NotAnImage)
}
