//! Account endpoints.
//!
//! ```text
//! POST  /api/v1/users        {"email","password","name"}
//! POST  /api/v1/users/token  {"email","password"}
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me     {"email"?, "password"?, "name"?}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{NewAccount, ProfileUpdate};
use crate::domain::{
    Email, Error, FieldError, LoginCredentials, LoginValidationError, Password, User, UserName,
    UserValidationError,
};

use super::ApiResult;
use super::auth::Authenticated;
use super::state::HttpState;
use super::validation::{FieldCode, FieldErrors, finish_fields};

/// Registration body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Login email.
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    /// Plain-text password, at least five characters.
    #[schema(example = "testpass123")]
    pub password: Option<String>,
    /// Display name.
    #[schema(example = "Jamie")]
    pub name: Option<String>,
}

/// Token request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    /// Login email.
    pub email: Option<String>,
    /// Plain-text password.
    pub password: Option<String>,
}

/// Self-service profile changes. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileRequest {
    /// New login email.
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New display name.
    pub name: Option<String>,
}

/// Public account representation. The password never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().as_str().to_owned(),
            name: user.name().as_str().to_owned(),
        }
    }
}

/// Issued API token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Send as `Authorization: Token <token>`.
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

/// Names are required on registration even though the account model
/// accepts an empty one.
#[derive(Debug, thiserror::Error)]
enum RequiredNameError {
    #[error("This field may not be blank.")]
    Blank,
    #[error(transparent)]
    Invalid(#[from] UserValidationError),
}

impl FieldCode for RequiredNameError {
    fn field_code(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Invalid(inner) => inner.field_code(),
        }
    }
}

fn required_name(raw: &str) -> Result<UserName, RequiredNameError> {
    let name = UserName::new(raw)?;
    if name.is_empty() {
        return Err(RequiredNameError::Blank);
    }
    Ok(name)
}

impl TryFrom<RegisterRequest> for NewAccount {
    type Error = Error;

    fn try_from(body: RegisterRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let (email, password, name) = finish_fields!(
            errors,
            email = errors.require("email", body.email.as_deref(), Email::parse),
            password = errors.require("password", body.password.as_deref(), Password::new),
            name = errors.require("name", body.name.as_deref(), required_name),
        );
        Ok(Self {
            email,
            password,
            name,
        })
    }
}

impl TryFrom<ProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(body: ProfileRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let (email, password, name) = finish_fields!(
            errors,
            email = errors.optional("email", body.email.as_deref(), Email::parse),
            password = errors.optional("password", body.password.as_deref(), Password::new),
            name = errors.optional("name", body.name.as_deref(), required_name),
        );
        Ok(Self {
            email,
            password,
            name,
        })
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::validation(vec![FieldError::new(
        field,
        "required",
        "This field is required.",
    )])
}

impl TryFrom<TokenRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(body: TokenRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .map_err(map_login_validation_error)
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid or duplicate fields", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let account = NewAccount::try_from(payload.into_inner())?;
    let user = state.accounts.register(account).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for an API token.
#[utoipa::path(
    post,
    path = "/api/v1/users/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing fields or bad credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "issueToken",
    security([])
)]
#[post("/users/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let token = state.accounts.issue_token(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

/// The calling account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(caller: Authenticated) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(caller.user()))
}

/// Update the calling account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid or duplicate fields", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let user = state.accounts.update_profile(caller.id(), update).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
