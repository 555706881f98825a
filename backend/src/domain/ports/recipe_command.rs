//! Driving port for recipe authoring.
//!
//! Every mutation names its actor explicitly. Only a recipe's author may
//! change or delete it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{CompositionEntry, Error, Recipe, RecipeFields, RecipeId, UserId};

/// Request to publish a new recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    /// Author who will own the recipe.
    pub author: UserId,
    /// Scalar fields.
    pub fields: RecipeFields,
    /// Ingredient list; must be non-empty and duplicate-free.
    pub composition: Vec<CompositionEntry>,
}

/// Request to swap a recipe's whole ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceCompositionRequest {
    /// User performing the change.
    pub actor: UserId,
    /// Recipe to change.
    pub recipe_id: RecipeId,
    /// Replacement list; validated exactly like a create.
    pub composition: Vec<CompositionEntry>,
}

/// Request to edit a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    /// User performing the change.
    pub actor: UserId,
    /// Recipe to change.
    pub recipe_id: RecipeId,
    /// New scalar fields.
    pub fields: RecipeFields,
    /// `None` keeps the current composition; `Some` replaces it wholesale.
    ///
    /// `Some(vec![])` is rejected as an empty composition.
    pub composition: Option<Vec<CompositionEntry>>,
}

/// Recipe authoring use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Validate and store a recipe with its composition in one step.
    ///
    /// # Errors
    ///
    /// - `EmptyComposition`, `DuplicateIngredientInComposition`, or
    ///   `InvalidAmount` for malformed compositions.
    /// - `UnknownIngredient` when an ingredient id is not in the catalogue.
    async fn create_recipe(&self, request: CreateRecipeRequest) -> Result<Recipe, Error>;

    /// Replace the composition of an existing recipe.
    async fn replace_composition(
        &self,
        request: ReplaceCompositionRequest,
    ) -> Result<Recipe, Error>;

    /// Update recipe fields and optionally its composition.
    async fn update_recipe(&self, request: UpdateRecipeRequest) -> Result<Recipe, Error>;

    /// Delete a recipe with its composition and the relations pointing at it.
    async fn delete_recipe(&self, actor: &UserId, recipe_id: &RecipeId) -> Result<(), Error>;
}
