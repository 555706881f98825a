//! Ingredient catalogue entities.
//!
//! An ingredient is a `(name, measurement unit)` pair. The pair is globally
//! unique: two ingredients may share a name only when their units differ.
//! Units are opaque strings; "g" and "kg" are simply different units.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{TextCheck, check_bounded_text};

/// Maximum length of an ingredient name, in characters.
pub const INGREDIENT_NAME_MAX: usize = 128;
/// Maximum length of a measurement unit, in characters.
pub const MEASUREMENT_UNIT_MAX: usize = 64;

/// Validation errors raised while building ingredient values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngredientValidationError {
    /// The name was empty or whitespace.
    #[error("ingredient name must not be empty")]
    EmptyName,
    /// The name exceeded [`INGREDIENT_NAME_MAX`].
    #[error("ingredient name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The unit was empty or whitespace.
    #[error("measurement unit must not be empty")]
    EmptyUnit,
    /// The unit exceeded [`MEASUREMENT_UNIT_MAX`].
    #[error("measurement unit must be at most {max} characters")]
    UnitTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Stable ingredient identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IngredientId(Uuid);

impl IngredientId {
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

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-readable ingredient name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IngredientName(String);

impl IngredientName {
    /// Validate and construct an ingredient name.
    pub fn new(name: impl Into<String>) -> Result<Self, IngredientValidationError> {
        let name = name.into();
        match check_bounded_text(&name, INGREDIENT_NAME_MAX) {
            TextCheck::Ok => Ok(Self(name)),
            TextCheck::Blank => Err(IngredientValidationError::EmptyName),
            TextCheck::TooLong => Err(IngredientValidationError::NameTooLong {
                max: INGREDIENT_NAME_MAX,
            }),
        }
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for IngredientName {
    type Error = IngredientValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IngredientName> for String {
    fn from(value: IngredientName) -> Self {
        value.0
    }
}

impl fmt::Display for IngredientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque measurement unit compared by byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MeasurementUnit(String);

impl MeasurementUnit {
    /// Validate and construct a measurement unit.
    pub fn new(unit: impl Into<String>) -> Result<Self, IngredientValidationError> {
        let unit = unit.into();
        match check_bounded_text(&unit, MEASUREMENT_UNIT_MAX) {
            TextCheck::Ok => Ok(Self(unit)),
            TextCheck::Blank => Err(IngredientValidationError::EmptyUnit),
            TextCheck::TooLong => Err(IngredientValidationError::UnitTooLong {
                max: MEASUREMENT_UNIT_MAX,
            }),
        }
    }

    /// Borrow the unit as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for MeasurementUnit {
    type Error = IngredientValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MeasurementUnit> for String {
    fn from(value: MeasurementUnit) -> Self {
        value.0
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ingredient awaiting insertion into the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngredientDraft {
    /// Ingredient name.
    pub name: IngredientName,
    /// Measurement unit.
    pub measurement_unit: MeasurementUnit,
}

impl IngredientDraft {
    /// Validate raw strings into a draft.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::IngredientDraft;
    ///
    /// let draft = IngredientDraft::try_new("flour", "g").expect("valid draft");
    /// assert_eq!(draft.name.as_str(), "flour");
    /// assert!(IngredientDraft::try_new("flour", " ").is_err());
    /// ```
    pub fn try_new(
        name: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> Result<Self, IngredientValidationError> {
        Ok(Self {
            name: IngredientName::new(name)?,
            measurement_unit: MeasurementUnit::new(measurement_unit)?,
        })
    }
}

/// Persisted catalogue ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Stable identifier.
    pub id: IngredientId,
    /// Ingredient name.
    pub name: IngredientName,
    /// Measurement unit.
    pub measurement_unit: MeasurementUnit,
}

impl Ingredient {
    /// Materialise a draft under the given identifier.
    pub fn from_draft(id: IngredientId, draft: IngredientDraft) -> Self {
        Self {
            id,
            name: draft.name,
            measurement_unit: draft.measurement_unit,
        }
    }

    /// Catalogue display order: by name, then unit.
    pub fn display_order(&self, other: &Self) -> std::cmp::Ordering {
        (&self.name, &self.measurement_unit).cmp(&(&other.name, &other.measurement_unit))
    }
}
