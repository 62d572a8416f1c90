//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed records for accounts, labels and recipes,
//! the query-narrowing rules shared by list operations, and the services that
//! implement the driving ports on top of the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`Label`], [`Recipe`]: stored records.
//! - [`LabelQuery`], [`RecipeQuery`]: list narrowing options.
//! - [`AccountService`], [`LabelService`], [`RecipeService`]: use-cases.

pub mod access;
mod account_service;
mod auth;
pub mod error;
mod label;
mod label_service;
mod password;
pub mod ports;
mod recipe;
mod recipe_image;
mod recipe_service;
mod trace_id;
mod user;

pub use self::access::{LabelQuery, RecipeQuery};
pub use self::account_service::AccountService;
pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, PASSWORD_MIN, Password,
    PasswordValidationError, TokenDigest,
};
pub use self::error::{Error, ErrorCode, FieldError, TRACE_ID_HEADER};
pub use self::label::{
    LABEL_NAME_MAX, Label, LabelId, LabelKind, LabelName, LabelValidationError,
};
pub use self::label_service::LabelService;
pub use self::password::{CredentialHasher, PasswordHash, PasswordHashError};
pub use self::recipe::{
    CookingTime, ImagePath, Price, Recipe, RecipeDetail, RecipeDraft, RecipeId, RecipeLink,
    RecipePatch, RecipeTitle, RecipeValidationError, TIME_MAX,
};
pub use self::recipe_image::{
    EXTENSION_MAX_LEN, ImageValidationError, RECIPE_UPLOAD_DIR, UploadIdGenerator, UuidUploadIds,
    recipe_image_file_path, validate_image,
};
pub use self::recipe_service::RecipeService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUserError, User, UserFlags, UserId, UserName, UserValidationError,
};
