//! Recipe entities and their scalar field types.
//!
//! A recipe belongs to exactly one author for its whole lifetime. Its
//! composition is held separately as [`RecipeIngredient`] rows and is always
//! presented ordered by ingredient name, then unit.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{TextCheck, check_bounded_text};
use super::{Ingredient, IngredientId, UserId};

/// Maximum length of a recipe name, in characters.
pub const RECIPE_NAME_MAX: usize = 256;
/// Smallest accepted cooking time, in minutes.
pub const MIN_COOKING_TIME: u32 = 1;
/// Largest accepted cooking time, in minutes.
pub const MAX_COOKING_TIME: u32 = 32_000;
/// Smallest accepted ingredient amount.
pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
/// Largest accepted ingredient amount.
pub const MAX_INGREDIENT_AMOUNT: i64 = 32_000;

/// Validation errors raised while building recipe values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    /// The name was empty or whitespace.
    #[error("recipe name must not be empty")]
    EmptyName,
    /// The name exceeded [`RECIPE_NAME_MAX`].
    #[error("recipe name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The description was empty or whitespace.
    #[error("recipe text must not be empty")]
    EmptyText,
    /// Cooking time fell outside the accepted range.
    #[error("cooking time {minutes} must be between {min} and {max} minutes")]
    CookingTimeOutOfRange {
        /// Rejected value.
        minutes: i64,
        /// Inclusive lower bound.
        min: u32,
        /// Inclusive upper bound.
        max: u32,
    },
    /// Ingredient amount fell outside the accepted range.
    #[error("amount {amount} must be between {min} and {max}")]
    AmountOutOfRange {
        /// Rejected value.
        amount: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

/// Stable recipe identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Recipe title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeName(String);

impl RecipeName {
    /// Validate and construct a recipe name.
    pub fn new(name: impl Into<String>) -> Result<Self, RecipeValidationError> {
        let name = name.into();
        match check_bounded_text(&name, RECIPE_NAME_MAX) {
            TextCheck::Ok => Ok(Self(name)),
            TextCheck::Blank => Err(RecipeValidationError::EmptyName),
            TextCheck::TooLong => Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            }),
        }
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RecipeName {
    type Error = RecipeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecipeName> for String {
    fn from(value: RecipeName) -> Self {
        value.0
    }
}

impl fmt::Display for RecipeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cooking time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct CookingTime(u32);

impl CookingTime {
    /// Validate a cooking time given in minutes.
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        u32::try_from(minutes)
            .ok()
            .filter(|value| (MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(value))
            .map(Self)
            .ok_or(RecipeValidationError::CookingTimeOutOfRange {
                minutes,
                min: MIN_COOKING_TIME,
                max: MAX_COOKING_TIME,
            })
    }

    /// Minutes as an unsigned integer.
    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for CookingTime {
    type Error = RecipeValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CookingTime> for u32 {
    fn from(value: CookingTime) -> Self {
        value.0
    }
}

/// Quantity of one ingredient within a recipe.
///
/// Always within `[MIN_INGREDIENT_AMOUNT, MAX_INGREDIENT_AMOUNT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Amount(u32);

impl Amount {
    /// Validate a raw amount.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::Amount;
    ///
    /// assert_eq!(Amount::new(250).map(|amount| amount.get()), Ok(250));
    /// assert!(Amount::new(0).is_err());
    /// assert!(Amount::new(32_001).is_err());
    /// ```
    pub fn new(amount: i64) -> Result<Self, RecipeValidationError> {
        if !(MIN_INGREDIENT_AMOUNT..=MAX_INGREDIENT_AMOUNT).contains(&amount) {
            return Err(RecipeValidationError::AmountOutOfRange {
                amount,
                min: MIN_INGREDIENT_AMOUNT,
                max: MAX_INGREDIENT_AMOUNT,
            });
        }
        u32::try_from(amount)
            .map(Self)
            .map_err(|_| RecipeValidationError::AmountOutOfRange {
                amount,
                min: MIN_INGREDIENT_AMOUNT,
                max: MAX_INGREDIENT_AMOUNT,
            })
    }

    /// Amount as an unsigned integer.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = RecipeValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u32 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Scalar recipe fields that an author may edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFields {
    name: RecipeName,
    text: String,
    cooking_time: CookingTime,
}

impl RecipeFields {
    /// Build fields from already-validated parts.
    pub fn new(
        name: RecipeName,
        text: impl Into<String>,
        cooking_time: CookingTime,
    ) -> Result<Self, RecipeValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        Ok(Self {
            name,
            text,
            cooking_time,
        })
    }

    /// Validate raw input into recipe fields.
    pub fn try_new(
        name: impl Into<String>,
        text: impl Into<String>,
        cooking_time: i64,
    ) -> Result<Self, RecipeValidationError> {
        Self::new(
            RecipeName::new(name)?,
            text,
            CookingTime::new(cooking_time)?,
        )
    }

    /// Recipe title.
    pub fn name(&self) -> &RecipeName {
        &self.name
    }

    /// Free-text preparation instructions.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Cooking time in minutes.
    pub fn cooking_time(&self) -> CookingTime {
        self.cooking_time
    }
}

/// Unvalidated composition input as submitted by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionEntry {
    /// Referenced catalogue ingredient.
    pub ingredient_id: IngredientId,
    /// Requested quantity, range-checked during validation.
    pub amount: i64,
}

impl CompositionEntry {
    /// Convenience constructor.
    pub fn new(ingredient_id: IngredientId, amount: i64) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// One resolved line of a recipe's composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Catalogue ingredient.
    pub ingredient: Ingredient,
    /// Quantity in the ingredient's unit.
    pub amount: Amount,
}

/// Persisted recipe with its resolved composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Stable identifier.
    pub id: RecipeId,
    /// Owning author; never changes.
    pub author: UserId,
    /// Editable scalar fields.
    pub fields: RecipeFields,
    /// Creation timestamp used for default ordering.
    pub created_at: DateTime<Utc>,
    /// Composition ordered by ingredient name, then unit.
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Sort a composition into presentation order.
    pub fn sort_ingredients(ingredients: &mut [RecipeIngredient]) {
        ingredients.sort_by(|left, right| left.ingredient.display_order(&right.ingredient));
    }

    /// Whether `user` authored this recipe.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author.as_uuid() == user.as_uuid()
    }
}

/// Filter applied when listing recipes.
///
/// All populated criteria must hold. An empty filter lists every recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListFilter {
    /// Only recipes written by this author.
    pub author: Option<UserId>,
    /// Only recipes this user has favourited.
    pub favorited_by: Option<UserId>,
    /// Only recipes in this user's shopping cart.
    pub in_cart_of: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IngredientDraft;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(32_001)]
    fn amount_rejects_out_of_range(#[case] raw: i64) {
        assert_eq!(
            Amount::new(raw),
            Err(RecipeValidationError::AmountOutOfRange {
                amount: raw,
                min: MIN_INGREDIENT_AMOUNT,
                max: MAX_INGREDIENT_AMOUNT,
            })
        );
    }

    #[rstest]
    #[case(1)]
    #[case(32_000)]
    fn amount_accepts_bounds(#[case] raw: i64) {
        let amount = Amount::new(raw).expect("amount within bounds");
        assert_eq!(i64::from(amount.get()), raw);
    }

    #[rstest]
    #[case(0)]
    #[case(32_001)]
    #[case(i64::MAX)]
    fn cooking_time_rejects_out_of_range(#[case] raw: i64) {
        assert!(matches!(
            CookingTime::new(raw),
            Err(RecipeValidationError::CookingTimeOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case("", "stir", 5, RecipeValidationError::EmptyName)]
    #[case("Soup", "   ", 5, RecipeValidationError::EmptyText)]
    fn fields_reject_blank_text(
        #[case] name: &str,
        #[case] text: &str,
        #[case] minutes: i64,
        #[case] expected: RecipeValidationError,
    ) {
        assert_eq!(RecipeFields::try_new(name, text, minutes), Err(expected));
    }

    #[rstest]
    fn fields_reject_overlong_name() {
        let name = "n".repeat(RECIPE_NAME_MAX + 1);
        assert_eq!(
            RecipeFields::try_new(name, "stir", 5),
            Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX
            })
        );
    }

    #[rstest]
    fn composition_entry_deserialises_camel_case() {
        let id = IngredientId::random();
        let payload = serde_json::json!({ "ingredientId": id, "amount": 0 });
        let entry: CompositionEntry = serde_json::from_value(payload).expect("entry");
        assert_eq!(entry, CompositionEntry::new(id, 0));
    }

    #[rstest]
    fn sort_ingredients_orders_by_name_then_unit() {
        let line = |name: &str, unit: &str| RecipeIngredient {
            ingredient: Ingredient::from_draft(
                IngredientId::random(),
                IngredientDraft::try_new(name, unit).expect("draft"),
            ),
            amount: Amount::new(1).expect("amount"),
        };
        let mut lines = vec![line("salt", "tsp"), line("flour", "kg"), line("flour", "g")];

        Recipe::sort_ingredients(&mut lines);

        let order: Vec<_> = lines
            .iter()
            .map(|item| {
                (
                    item.ingredient.name.as_str(),
                    item.ingredient.measurement_unit.as_str(),
                )
            })
            .collect();
        assert_eq!(order, [("flour", "g"), ("flour", "kg"), ("salt", "tsp")]);
    }
}
