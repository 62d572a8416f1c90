//! Token authentication for HTTP handlers.
//!
//! Handlers that need a caller take an [`Authenticated`] argument. The
//! extractor reads `Authorization: Token <key>` and resolves the key through
//! [`AccountCommand::authenticate_token`](crate::domain::ports::AccountCommand).

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User, UserId};

use super::state::HttpState;

const SCHEME: &str = "token";

/// The active account behind the request's token.
#[derive(Debug, Clone)]
pub struct Authenticated(
    /// The caller's account.
    pub User,
);

impl Authenticated {
    /// The caller's account.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.0
    }

    /// The caller's id.
    #[must_use]
    pub fn id(&self) -> &UserId {
        self.0.id()
    }
}

/// Pull the key out of an `Authorization` header value.
///
/// The scheme keyword is matched case-insensitively. Headers for other
/// schemes count as absent.
pub(crate) fn token_from_header(value: Option<&str>) -> Result<&str, Error> {
    let Some(header) = value else {
        return Err(Error::unauthorized(
            "Authentication credentials were not provided.",
        ));
    };
    let mut parts = header.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => {}
        _ => {
            return Err(Error::unauthorized(
                "Authentication credentials were not provided.",
            ));
        }
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(key),
        (None, _) => Err(Error::unauthorized(
            "Invalid token header. No credentials provided.",
        )),
        (Some(_), Some(_)) => Err(Error::unauthorized(
            "Invalid token header. Token string should not contain spaces.",
        )),
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_owned));
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state missing from application"))?;
            let value = header
                .transpose()
                .map_err(|_| Error::unauthorized("Invalid token header."))?;
            let key = token_from_header(value.as_deref())?;
            let user = state.accounts.authenticate_token(key).await?;
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Token abc"), "abc")]
    #[case(Some("token abc"), "abc")]
    #[case(Some("TOKEN   abc"), "abc")]
    fn key_is_extracted(#[case] header: Option<&str>, #[case] expected: &str) {
        assert_eq!(token_from_header(header).expect("key"), expected);
    }

    #[rstest]
    #[case(None, "Authentication credentials were not provided.")]
    #[case(Some("Bearer abc"), "Authentication credentials were not provided.")]
    #[case(Some("Token"), "Invalid token header. No credentials provided.")]
    #[case(
        Some("Token a b"),
        "Invalid token header. Token string should not contain spaces."
    )]
    fn bad_headers_are_unauthorised(#[case] header: Option<&str>, #[case] message: &str) {
        let err = token_from_header(header).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }
}
