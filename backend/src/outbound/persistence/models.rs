//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every column and report failures as plain messages, which the
//! repositories wrap in their own query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ingredients, recipe_ingredients, recipes, users};
use crate::domain::{
    Amount, CompositionRow, Ingredient, IngredientId, IngredientName, IngredientValidationError,
    MeasurementUnit, RecipeFields, RecipeId, User, UserId, Username,
};

/// Cast a bounded domain quantity to the `INTEGER` column type.
///
/// Cooking times and amounts are capped at 32000 by their constructors.
#[expect(
    clippy::cast_possible_wrap,
    reason = "bounded quantities never exceed 32000"
)]
pub(crate) fn bounded_to_db(value: u32) -> i32 {
    value as i32
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|err| format!("stored user {} is invalid: {err}", row.id))?;
        Ok(User::new(UserId::from_uuid(row.id), username))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
}

/// Row struct for reading from the ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = String;

    fn try_from(row: IngredientRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid =
            |err: IngredientValidationError| format!("stored ingredient {id} is invalid: {err}");
        Ok(Ingredient {
            id: IngredientId::from_uuid(id),
            name: IngredientName::new(row.name).map_err(invalid)?,
            measurement_unit: MeasurementUnit::new(row.measurement_unit).map_err(invalid)?,
        })
    }
}

/// Insertable struct for catalogue entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub body: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

impl RecipeRow {
    /// Re-validate the editable columns.
    pub(crate) fn fields(&self) -> Result<RecipeFields, String> {
        RecipeFields::try_new(
            self.name.clone(),
            self.body.clone(),
            i64::from(self.cooking_time),
        )
        .map_err(|err| format!("stored recipe {} is invalid: {err}", self.id))
    }

    pub(crate) fn recipe_id(&self) -> RecipeId {
        RecipeId::from_uuid(self.id)
    }
}

/// Insertable struct for recipe headers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: &'a str,
    pub body: &'a str,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the editable recipe columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub name: &'a str,
    pub body: &'a str,
    pub cooking_time: i32,
}

impl<'a> From<&'a RecipeFields> for RecipeUpdate<'a> {
    fn from(fields: &'a RecipeFields) -> Self {
        Self {
            name: fields.name().as_str(),
            body: fields.text(),
            cooking_time: bounded_to_db(fields.cooking_time().minutes()),
        }
    }
}

/// Composition row as stored.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount: i32,
}

impl RecipeIngredientRow {
    pub(crate) fn for_recipe(recipe: &RecipeId, rows: &[CompositionRow]) -> Vec<Self> {
        rows.iter()
            .map(|row| Self {
                recipe_id: *recipe.as_uuid(),
                ingredient_id: *row.ingredient_id.as_uuid(),
                amount: bounded_to_db(row.amount.get()),
            })
            .collect()
    }
}

/// Validate a stored amount.
pub(crate) fn stored_amount(recipe_id: Uuid, amount: i32) -> Result<Amount, String> {
    Amount::new(i64::from(amount))
        .map_err(|err| format!("stored composition of recipe {recipe_id} is invalid: {err}"))
}
