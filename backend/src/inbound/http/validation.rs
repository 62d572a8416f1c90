//! Field-level validation helpers shared by request DTO conversions.
//!
//! Request bodies are checked field by field so one response reports every
//! problem at once. Each domain validation error maps to a stable code.

use std::fmt::Display;

use serde::{Deserialize, Deserializer};

use crate::domain::{
    Error, FieldError, LabelValidationError, PasswordValidationError, RecipeValidationError,
    UserValidationError,
};

/// Stable machine-readable code for a field validation failure.
pub(crate) trait FieldCode: Display {
    fn field_code(&self) -> &'static str;
}

impl FieldCode for UserValidationError {
    fn field_code(&self) -> &'static str {
        match self {
            Self::MissingEmail => "required",
            Self::InvalidEmail | Self::InvalidId => "invalid",
            Self::EmailTooLong { .. } | Self::NameTooLong { .. } => "max_length",
        }
    }
}

impl FieldCode for PasswordValidationError {
    fn field_code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "min_length",
        }
    }
}

impl FieldCode for LabelValidationError {
    fn field_code(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::TooLong { .. } => "max_length",
        }
    }
}

impl FieldCode for RecipeValidationError {
    fn field_code(&self) -> &'static str {
        match self {
            Self::BlankTitle => "blank",
            Self::TitleTooLong { .. } | Self::LinkTooLong { .. } => "max_length",
            Self::NegativeTime | Self::NegativePrice => "min_value",
            Self::PriceTooPrecise { .. } => "max_decimal_places",
            Self::TimeTooLarge { .. } => "max_value",
            Self::PriceTooLarge { .. } => "max_digits",
        }
    }
}

/// Deserialize a nullable field so `null` stays distinct from absence.
///
/// Pair with `#[serde(default)]`: an absent key becomes `None` and an explicit
/// `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accumulates field errors while a request body is converted.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a missing required field.
    pub(crate) fn required(&mut self, field: &str) {
        self.0
            .push(FieldError::new(field, "required", "This field is required."));
    }

    /// Record an explicit `null` for a field that does not accept one.
    pub(crate) fn null(&mut self, field: &str) {
        self.0
            .push(FieldError::new(field, "null", "This field may not be null."));
    }

    /// Strip the `null` layer from a nullable field, recording `null` as an
    /// error. Absent values stay absent.
    pub(crate) fn non_null<R>(&mut self, field: &str, raw: Option<Option<R>>) -> Option<Option<R>> {
        match raw {
            Some(None) => {
                self.null(field);
                None
            }
            Some(Some(value)) => Some(Some(value)),
            None => Some(None),
        }
    }

    /// Check a required field that must not be `null` either.
    pub(crate) fn require_non_null<R, T, E, F>(
        &mut self,
        field: &str,
        raw: Option<Option<R>>,
        parse: F,
    ) -> Option<T>
    where
        E: FieldCode,
        F: FnOnce(R) -> Result<T, E>,
    {
        let present = self.non_null(field, raw)?;
        self.require(field, present, parse)
    }

    /// Check an optional field that must not be `null`.
    pub(crate) fn optional_non_null<R, T, E, F>(
        &mut self,
        field: &str,
        raw: Option<Option<R>>,
        parse: F,
    ) -> Option<Option<T>>
    where
        E: FieldCode,
        F: FnOnce(R) -> Result<T, E>,
    {
        let present = self.non_null(field, raw)?;
        self.optional(field, present, parse)
    }

    /// Keep the value of a successful check, recording the failure otherwise.
    pub(crate) fn check<T, E: FieldCode>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0
                    .push(FieldError::new(field, err.field_code(), err.to_string()));
                None
            }
        }
    }

    /// Check a required field: absent values are recorded as missing.
    pub(crate) fn require<R, T, E, F>(&mut self, field: &str, raw: Option<R>, parse: F) -> Option<T>
    where
        E: FieldCode,
        F: FnOnce(R) -> Result<T, E>,
    {
        match raw {
            Some(value) => self.check(field, parse(value)),
            None => {
                self.required(field);
                None
            }
        }
    }

    /// Check an optional field: absent values stay absent.
    pub(crate) fn optional<R, T, E, F>(
        &mut self,
        field: &str,
        raw: Option<R>,
        parse: F,
    ) -> Option<Option<T>>
    where
        E: FieldCode,
        F: FnOnce(R) -> Result<T, E>,
    {
        match raw {
            Some(value) => self.check(field, parse(value)).map(Some),
            None => Some(None),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn collected failures into a validation error.
    pub(crate) fn into_error(self) -> Error {
        Error::validation(self.0)
    }
}

/// Run each field check, then unwrap the values [`FieldErrors`] vouched for.
///
/// Every check runs before anything is unwrapped so all failures are
/// reported together. Returns the validation error when any field failed
/// or any value is missing.
macro_rules! finish_fields {
    ($errors:expr, $($name:ident = $check:expr),+ $(,)?) => {
        match ($($check,)+) {
            ($(Some($name),)+) if $errors.is_empty() => ($($name,)+),
            _ => return Err($errors.into_error()),
        }
    };
}

pub(crate) use finish_fields;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, LabelName, RecipeTitle};
    use rstest::rstest;

    fn convert(name: Option<&str>, title: Option<&str>) -> Result<(LabelName, RecipeTitle), Error> {
        let mut errors = FieldErrors::new();
        Ok(finish_fields!(
            errors,
            label = errors.require("name", name, LabelName::new),
            recipe_title = errors.require("title", title, RecipeTitle::new),
        ))
    }

    #[rstest]
    fn every_failing_field_is_reported() {
        let err = convert(Some("  "), None).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let fields = err.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field(), "name");
        assert_eq!(fields[0].code(), "blank");
        assert_eq!(fields[1].field(), "title");
        assert_eq!(fields[1].code(), "required");
    }

    #[rstest]
    fn valid_fields_pass_through() {
        let (name, title) = convert(Some("Vegan"), Some("Curry")).expect("valid");
        assert_eq!(name.as_str(), "Vegan");
        assert_eq!(title.as_str(), "Curry");
    }

    #[derive(Debug, serde::Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "nullable")]
        title: Option<Option<String>>,
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"title": null}"#, Some(None))]
    #[case(r#"{"title": "Soup"}"#, Some(Some("Soup")))]
    fn nullable_keeps_null_apart_from_absent(
        #[case] raw: &str,
        #[case] expected: Option<Option<&str>>,
    ) {
        let body: Body = serde_json::from_str(raw).expect("body");
        assert_eq!(
            body.title.as_ref().map(Option::as_deref),
            expected
        );
    }

    #[rstest]
    fn null_required_field_is_reported_once() {
        let mut errors = FieldErrors::new();
        let title = errors.require_non_null("title", Some(None::<&str>), RecipeTitle::new);
        assert!(title.is_none());
        let err = errors.into_error();
        let fields = err.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].code(), "null");
        assert_eq!(fields[0].message(), "This field may not be null.");
    }

    #[rstest]
    fn absent_optional_non_null_field_stays_absent() {
        let mut errors = FieldErrors::new();
        let title = errors.optional_non_null("title", None::<Option<&str>>, RecipeTitle::new);
        assert_eq!(title, Some(None));
        assert!(errors.is_empty());
    }

    #[rstest]
    fn optional_absent_is_not_an_error() {
        let mut errors = FieldErrors::new();
        let link = errors.optional("link", None::<&str>, crate::domain::RecipeLink::parse);
        assert_eq!(link, Some(None));
        assert!(errors.is_empty());
    }
}
