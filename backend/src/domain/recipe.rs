//! Recipe records, drafts and the validated values they are built from.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Label, LabelId, UserId};

/// Maximum length of a recipe title.
pub const TITLE_MAX: usize = 255;
/// Maximum length of an external recipe link.
pub const LINK_MAX: usize = 255;
/// Total significant digits allowed in a price.
pub const PRICE_MAX_DIGITS: u32 = 5;
/// Digits allowed after the decimal point in a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Largest preparation time, in minutes, the store can hold.
pub const TIME_MAX: i32 = i32::MAX;

/// Validation errors for recipe fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    /// Title is empty after trimming.
    #[error("This field may not be blank.")]
    BlankTitle,
    /// Title exceeds [`TITLE_MAX`] characters.
    #[error("Ensure this field has no more than {max} characters.")]
    TitleTooLong {
        /// Character limit.
        max: usize,
    },
    /// Preparation time is below zero.
    #[error("Ensure this value is greater than or equal to 0.")]
    NegativeTime,
    /// Preparation time exceeds [`TIME_MAX`].
    #[error("Ensure this value is less than or equal to {max}.")]
    TimeTooLarge {
        /// Largest accepted value.
        max: i32,
    },
    /// Price is below zero.
    #[error("Ensure this value is greater than or equal to 0.")]
    NegativePrice,
    /// Price carries too many decimal places.
    #[error("Ensure that there are no more than {max} decimal places.")]
    PriceTooPrecise {
        /// Decimal places allowed.
        max: u32,
    },
    /// Price carries too many digits overall.
    #[error("Ensure that there are no more than {max} digits in total.")]
    PriceTooLarge {
        /// Total digits allowed.
        max: u32,
    },
    /// Link exceeds [`LINK_MAX`] characters.
    #[error("Ensure this field has no more than {max} characters.")]
    LinkTooLong {
        /// Character limit.
        max: usize,
    },
}

/// Database identifier of a recipe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RecipeId(i64);

impl RecipeId {
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

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trimmed, non-empty recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    /// Trim and validate a title.
    ///
    /// # Errors
    /// [`RecipeValidationError::BlankTitle`] or
    /// [`RecipeValidationError::TitleTooLong`].
    pub fn new(raw: &str) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::BlankTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The validated title.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Preparation time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookingTime(i32);

impl CookingTime {
    /// Validate a time in minutes.
    ///
    /// # Errors
    /// [`RecipeValidationError::NegativeTime`] below zero and
    /// [`RecipeValidationError::TimeTooLarge`] above [`TIME_MAX`].
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        if minutes < 0 {
            return Err(RecipeValidationError::NegativeTime);
        }
        i32::try_from(minutes)
            .map(Self)
            .map_err(|_| RecipeValidationError::TimeTooLarge { max: TIME_MAX })
    }

    /// Minutes as stored.
    #[must_use]
    pub const fn minutes(self) -> i32 {
        self.0
    }
}

/// Non-negative price with at most five digits, two of them decimals.
///
/// The stored value always carries exactly two decimal places.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(55, 1)).unwrap();
/// assert_eq!(price.to_string(), "5.50");
/// assert!(Price::new(Decimal::new(1000, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    /// Validate and rescale a price.
    ///
    /// # Errors
    /// Negative, over-precise or over-large values are rejected.
    pub fn new(value: Decimal) -> Result<Self, RecipeValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        let normalised = value.normalize();
        if normalised.scale() > PRICE_DECIMAL_PLACES {
            return Err(RecipeValidationError::PriceTooPrecise {
                max: PRICE_DECIMAL_PLACES,
            });
        }
        let limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
        if normalised.trunc() >= limit {
            return Err(RecipeValidationError::PriceTooLarge {
                max: PRICE_MAX_DIGITS,
            });
        }
        let mut scaled = normalised.abs();
        scaled.rescale(PRICE_DECIMAL_PLACES);
        Ok(Self(scaled))
    }

    /// The price with two decimal places.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional external link. Blank input means no link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    /// Trim a submitted link; blank input yields `None`.
    ///
    /// # Errors
    /// [`RecipeValidationError::LinkTooLong`] past [`LINK_MAX`] characters.
    pub fn parse(raw: &str) -> Result<Option<Self>, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > LINK_MAX {
            return Err(RecipeValidationError::LinkTooLong { max: LINK_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// The stored link.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Storage-relative path of an uploaded recipe image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath(String);

impl ImagePath {
    /// Wrap a path as recorded in storage.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Path relative to the media root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated recipe content, used for creation and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Recipe title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Price.
    pub price: Price,
    /// Optional external link.
    pub link: Option<RecipeLink>,
    /// Referenced tag ids.
    pub tags: Vec<LabelId>,
    /// Referenced ingredient ids.
    pub ingredients: Vec<LabelId>,
}

impl RecipeDraft {
    /// Sort and de-duplicate label references.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.tags.sort_unstable();
        self.tags.dedup();
        self.ingredients.sort_unstable();
        self.ingredients.dedup();
        self
    }
}

/// Partial update. `None` leaves a field unchanged; for `link`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    /// Replacement title.
    pub title: Option<RecipeTitle>,
    /// Replacement preparation time.
    pub time_minutes: Option<CookingTime>,
    /// Replacement price.
    pub price: Option<Price>,
    /// Replacement link; `Some(None)` clears it.
    pub link: Option<Option<RecipeLink>>,
    /// Replacement tag set.
    pub tags: Option<Vec<LabelId>>,
    /// Replacement ingredient set.
    pub ingredients: Option<Vec<LabelId>>,
}

impl RecipePatch {
    /// Merge the patch over an existing recipe.
    #[must_use]
    pub fn apply_to(self, recipe: &Recipe) -> RecipeDraft {
        RecipeDraft {
            title: self.title.unwrap_or_else(|| recipe.title.clone()),
            time_minutes: self.time_minutes.unwrap_or(recipe.time_minutes),
            price: self.price.unwrap_or(recipe.price),
            link: self.link.unwrap_or_else(|| recipe.link.clone()),
            tags: self.tags.unwrap_or_else(|| recipe.tags.clone()),
            ingredients: self.ingredients.unwrap_or_else(|| recipe.ingredients.clone()),
        }
        .normalised()
    }
}

/// A stored recipe with label references by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Database id.
    pub id: RecipeId,
    /// Owning account.
    pub owner: UserId,
    /// Recipe title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Price.
    pub price: Price,
    /// Optional external link.
    pub link: Option<RecipeLink>,
    /// Linked tag ids, ascending.
    pub tags: Vec<LabelId>,
    /// Linked ingredient ids, ascending.
    pub ingredients: Vec<LabelId>,
    /// Uploaded image, if any.
    pub image: Option<ImagePath>,
}

/// A recipe with its labels resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    /// The recipe itself.
    pub recipe: Recipe,
    /// Resolved tags, ascending by id.
    pub tags: Vec<Label>,
    /// Resolved ingredients, ascending by id.
    pub ingredients: Vec<Label>,
}
