//! Tags and ingredients.
//!
//! Both are user-owned named labels attached to recipes. They share one
//! record type and are told apart by [`LabelKind`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum length of a label name.
pub const LABEL_NAME_MAX: usize = 255;

/// Which label collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// A recipe tag such as "Vegan".
    Tag,
    /// A recipe ingredient such as "Kale".
    Ingredient,
}

impl LabelKind {
    /// Storage discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }

    /// Parse a storage discriminator.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "tag" => Some(Self::Tag),
            "ingredient" => Some(Self::Ingredient),
            _ => None,
        }
    }

    /// Request field that carries ids of this kind on a recipe.
    #[must_use]
    pub const fn recipe_field(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for label names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelValidationError {
    /// Name is empty after trimming.
    #[error("This field may not be blank.")]
    Blank,
    /// Name exceeds [`LABEL_NAME_MAX`] characters.
    #[error("Ensure this field has no more than {max} characters.")]
    TooLong {
        /// Character limit.
        max: usize,
    },
}

/// Database identifier of a label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct LabelId(i64);

impl LabelId {
    /// Wrap a raw database id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trimmed, non-empty label name.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LabelName;
///
/// assert_eq!(LabelName::new("  Vegan ").unwrap().as_str(), "Vegan");
/// assert!(LabelName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelName(String);

impl LabelName {
    /// Trim and validate a name.
    ///
    /// # Errors
    /// [`LabelValidationError::Blank`] or [`LabelValidationError::TooLong`].
    pub fn new(raw: &str) -> Result<Self, LabelValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LabelValidationError::Blank);
        }
        if trimmed.chars().count() > LABEL_NAME_MAX {
            return Err(LabelValidationError::TooLong {
                max: LABEL_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored tag or ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Database id.
    pub id: LabelId,
    /// Tag or ingredient.
    pub kind: LabelKind,
    /// Owning account.
    pub owner: UserId,
    /// Display name.
    pub name: LabelName,
}
