//! Validation of recipe compositions before they reach storage.
//!
//! A composition is valid when it is non-empty, references each ingredient at
//! most once, and every amount lies in the accepted range. Existence of the
//! referenced ingredients is checked separately by the recipe service because
//! it needs the catalogue.

use std::collections::HashMap;

use serde_json::json;

use super::{Amount, CompositionEntry, Error, IngredientId, RecipeValidationError};

/// Validated composition row ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositionRow {
    /// Referenced catalogue ingredient.
    pub ingredient_id: IngredientId,
    /// Quantity within the accepted range.
    pub amount: Amount,
}

/// Reasons a composition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// No entries were supplied.
    #[error("composition must contain at least one ingredient")]
    Empty,
    /// An ingredient appeared more than once.
    #[error("ingredient {ingredient_id} appears more than once")]
    DuplicateIngredient {
        /// The repeated ingredient whose first occurrence comes earliest.
        ingredient_id: IngredientId,
    },
    /// An amount fell outside the accepted range.
    #[error("ingredient {ingredient_id}: {source}")]
    InvalidAmount {
        /// Ingredient carrying the bad amount.
        ingredient_id: IngredientId,
        /// Range failure.
        source: RecipeValidationError,
    },
}

impl From<CompositionError> for Error {
    fn from(value: CompositionError) -> Self {
        let message = value.to_string();
        match value {
            CompositionError::Empty => Error::empty_composition(message),
            CompositionError::DuplicateIngredient { ingredient_id } => {
                Error::duplicate_ingredient(message)
                    .with_details(json!({ "ingredientId": ingredient_id }))
            }
            CompositionError::InvalidAmount {
                ingredient_id,
                source,
            } => {
                let details = match source {
                    RecipeValidationError::AmountOutOfRange { amount, min, max } => json!({
                        "ingredientId": ingredient_id,
                        "amount": amount,
                        "min": min,
                        "max": max,
                    }),
                    _ => json!({ "ingredientId": ingredient_id }),
                };
                Error::invalid_amount(message).with_details(details)
            }
        }
    }
}

/// Non-empty, duplicate-free, range-checked list of composition rows.
///
/// Rows keep the caller's input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition(Vec<CompositionRow>);

impl Composition {
    /// Validate raw entries.
    ///
    /// Checks run in a fixed order: emptiness, then duplicates, then amounts.
    /// For duplicates the reported ingredient is the repeated one whose first
    /// occurrence comes earliest in the input.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{Composition, CompositionEntry, CompositionError, IngredientId};
    ///
    /// let flour = IngredientId::random();
    /// let salt = IngredientId::random();
    /// let entries = [
    ///     CompositionEntry::new(salt, 1),
    ///     CompositionEntry::new(flour, 2),
    ///     CompositionEntry::new(flour, 3),
    ///     CompositionEntry::new(salt, 4),
    /// ];
    ///
    /// assert_eq!(
    ///     Composition::try_from_entries(&entries),
    ///     Err(CompositionError::DuplicateIngredient { ingredient_id: salt }),
    /// );
    /// ```
    pub fn try_from_entries(entries: &[CompositionEntry]) -> Result<Self, CompositionError> {
        if entries.is_empty() {
            return Err(CompositionError::Empty);
        }

        let mut occurrences: HashMap<IngredientId, usize> = HashMap::with_capacity(entries.len());
        for entry in entries {
            *occurrences.entry(entry.ingredient_id).or_default() += 1;
        }
        if let Some(repeated) = entries
            .iter()
            .find(|entry| occurrences.get(&entry.ingredient_id).is_some_and(|count| *count > 1))
        {
            return Err(CompositionError::DuplicateIngredient {
                ingredient_id: repeated.ingredient_id,
            });
        }

        let rows = entries
            .iter()
            .map(|entry| {
                Amount::new(entry.amount)
                    .map(|amount| CompositionRow {
                        ingredient_id: entry.ingredient_id,
                        amount,
                    })
                    .map_err(|source| CompositionError::InvalidAmount {
                        ingredient_id: entry.ingredient_id,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(rows))
    }

    /// Validated rows in input order.
    pub fn rows(&self) -> &[CompositionRow] {
        &self.0
    }

    /// Ingredient identifiers in input order.
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.0.iter().map(|row| row.ingredient_id).collect()
    }

    /// Consume the composition, yielding its rows.
    pub fn into_rows(self) -> Vec<CompositionRow> {
        self.0
    }
}
