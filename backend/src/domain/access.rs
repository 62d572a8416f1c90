//! Query narrowing shared by every list operation.
//!
//! A list request is always scoped to the caller first. Optional query
//! parameters then narrow the owned rows further:
//!
//! - labels: `assigned_only` keeps labels referenced by at least one recipe;
//! - recipes: `tags` / `ingredients` keep recipes referencing at least one of
//!   the listed ids in each supplied dimension (AND across, OR within).
//!
//! Results are ordered deterministically: labels by name then id, both
//! descending, with names compared byte by byte; recipes by id descending. Persistence adapters translate the
//! queries into their own filters; the helpers here are the in-process
//! rendition used by the memory adapter.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::{FieldError, Label, LabelId, Recipe};

/// Narrowing options for a tag or ingredient listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelQuery {
    /// Keep only labels referenced by at least one of the owner's recipes.
    pub assigned_only: bool,
}

impl LabelQuery {
    /// Parse raw query values.
    ///
    /// `assigned_only` is an integer flag: zero or absent is false, any other
    /// integer is true.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::LabelQuery;
    ///
    /// assert!(LabelQuery::parse(Some("1")).unwrap().assigned_only);
    /// assert!(!LabelQuery::parse(Some("0")).unwrap().assigned_only);
    /// assert!(LabelQuery::parse(Some("yes")).is_err());
    /// ```
    ///
    /// # Errors
    /// A [`FieldError`] for `assigned_only` when the value is not an integer.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let flag = match non_empty(raw) {
            None => false,
            Some(value) => {
                value.parse::<i64>().map_err(|_| {
                    FieldError::new("assigned_only", "invalid", "A valid integer is required.")
                })? != 0
            }
        };
        Ok(Self {
            assigned_only: flag,
        })
    }
}

/// Narrowing options for a recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Tag ids; a recipe must carry at least one.
    pub tags: Option<Vec<LabelId>>,
    /// Ingredient ids; a recipe must use at least one.
    pub ingredients: Option<Vec<LabelId>>,
}

impl RecipeQuery {
    /// Parse raw comma-separated id lists.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{LabelId, RecipeQuery};
    ///
    /// let query = RecipeQuery::parse(Some("1, 2"), None).unwrap();
    /// assert_eq!(query.tags, Some(vec![LabelId::new(1), LabelId::new(2)]));
    /// assert!(RecipeQuery::parse(Some("1,x"), None).is_err());
    /// ```
    ///
    /// # Errors
    /// One [`FieldError`] per malformed list.
    pub fn parse(
        raw_tags: Option<&str>,
        raw_ingredients: Option<&str>,
    ) -> Result<Self, Vec<FieldError>> {
        match (
            parse_id_list("tags", raw_tags),
            parse_id_list("ingredients", raw_ingredients),
        ) {
            (Ok(tags), Ok(ingredients)) => Ok(Self { tags, ingredients }),
            (tags, ingredients) => Err(tags
                .err()
                .into_iter()
                .chain(ingredients.err())
                .collect()),
        }
    }

    /// Whether `recipe` satisfies every supplied dimension.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        any_referenced(self.tags.as_deref(), &recipe.tags)
            && any_referenced(self.ingredients.as_deref(), &recipe.ingredients)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_id_list(field: &str, raw: Option<&str>) -> Result<Option<Vec<LabelId>>, FieldError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    raw.split(',')
        .map(|item| {
            item.trim()
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .map(LabelId::new)
                .ok_or_else(|| {
                    FieldError::new(
                        field,
                        "invalid",
                        format!("Expected a comma-separated list of ids, got \"{raw}\"."),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn any_referenced(wanted: Option<&[LabelId]>, present: &[LabelId]) -> bool {
    wanted.is_none_or(|wanted| wanted.iter().any(|id| present.contains(id)))
}

/// Ordering applied to label listings.
///
/// Names compare by byte value, as the `C` collation on `labels.name` does.
#[must_use]
pub fn label_order(a: &Label, b: &Label) -> Ordering {
    b.name.cmp(&a.name).then_with(|| b.id.cmp(&a.id))
}

/// Ordering applied to recipe listings.
#[must_use]
pub fn recipe_order(a: &Recipe, b: &Recipe) -> Ordering {
    b.id.cmp(&a.id)
}

/// Apply a [`LabelQuery`] to labels already scoped to one owner and kind.
///
/// `recipes` are the owner's recipes, consulted for `assigned_only`.
#[must_use]
pub fn filter_labels(labels: Vec<Label>, recipes: &[Recipe], query: LabelQuery) -> Vec<Label> {
    let assigned: Option<HashSet<LabelId>> = query.assigned_only.then(|| {
        recipes
            .iter()
            .flat_map(|recipe| recipe.tags.iter().chain(recipe.ingredients.iter()))
            .copied()
            .collect()
    });
    let mut seen = HashSet::new();
    let mut kept: Vec<Label> = labels
        .into_iter()
        .filter(|label| assigned.as_ref().is_none_or(|ids| ids.contains(&label.id)))
        .filter(|label| seen.insert(label.id))
        .collect();
    kept.sort_by(label_order);
    kept
}

/// Apply a [`RecipeQuery`] to recipes already scoped to one owner.
#[must_use]
pub fn filter_recipes(recipes: Vec<Recipe>, query: &RecipeQuery) -> Vec<Recipe> {
    let mut kept: Vec<Recipe> = recipes
        .into_iter()
        .filter(|recipe| query.matches(recipe))
        .collect();
    kept.sort_by(recipe_order);
    kept
}
