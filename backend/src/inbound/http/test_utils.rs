//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;

use crate::domain::ports::{MockAccountCommand, MockLabelCatalogue, MockRecipeCatalogue};
use crate::domain::{Email, PasswordHash, User, UserFlags, UserId, UserName};

use super::state::HttpState;

/// Token accepted by [`accounts_authenticating`].
pub const TEST_TOKEN: &str = "test-token";

/// Header pair presenting [`TEST_TOKEN`].
#[must_use]
pub fn token_header() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Token {TEST_TOKEN}"))
}

/// An active account with a fixed id.
#[must_use]
pub fn sample_user() -> User {
    User::new(
        UserId::from_uuid(uuid::Uuid::from_u128(0x11)),
        Email::parse("cook@example.com").expect("email fixture"),
        UserName::new("Cook").expect("name fixture"),
        PasswordHash::from_phc("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA"),
        UserFlags::default(),
    )
}

/// Account mock that resolves [`TEST_TOKEN`] to `user` and rejects
/// everything else.
#[must_use]
pub fn accounts_authenticating(user: User) -> MockAccountCommand {
    let mut accounts = MockAccountCommand::new();
    accounts.expect_authenticate_token().returning(move |raw| {
        if raw == TEST_TOKEN {
            Ok(user.clone())
        } else {
            Err(crate::domain::Error::unauthorized("Invalid token."))
        }
    });
    accounts
}

/// Wrap mocks into handler state.
#[must_use]
pub fn state_with(
    accounts: MockAccountCommand,
    labels: MockLabelCatalogue,
    recipes: MockRecipeCatalogue,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(accounts),
        Arc::new(labels),
        Arc::new(recipes),
    ))
}

/// Boundary used by [`multipart_body`].
pub const MULTIPART_BOUNDARY: &str = "recipe-test-boundary";

/// Encode a single-field multipart form. `file_name: None` sends a plain
/// value instead of a file.
#[must_use]
pub fn multipart_body(field: &str, file_name: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let disposition = match file_name {
        Some(name) => {
            format!("form-data; name=\"{field}\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream")
        }
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body =
        format!("--{MULTIPART_BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\r\n").into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
