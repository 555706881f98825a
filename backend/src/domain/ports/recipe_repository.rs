//! Port for recipe storage, including the composition rows.
//!
//! Every write that touches more than one row runs as a single unit: readers
//! never see a recipe without its composition, nor a half-replaced list.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CompositionLine, CompositionRow, Recipe, RecipeFields, RecipeId, RecipeListFilter, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "recipe repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { message: String } =>
            "recipe write violated a uniqueness constraint: {message}",
        /// The author does not exist.
        UnknownAuthor { author: String } =>
            "recipe author {author} does not exist",
        /// A referenced ingredient does not exist at write time.
        MissingReference { message: String } =>
            "recipe references a missing row: {message}",
        /// The recipe disappeared before the write landed.
        NotFound { id: String } =>
            "recipe {id} not found",
    }
}

/// Fully validated recipe ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    /// Identifier chosen by the caller.
    pub id: RecipeId,
    /// Owning author.
    pub author: UserId,
    /// Scalar fields.
    pub fields: RecipeFields,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Composition rows; non-empty and duplicate-free.
    pub composition: Vec<CompositionRow>,
}

/// Recipe persistence port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert the recipe row and all of its composition rows atomically.
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RecipeRepositoryError>;

    /// Update scalar fields and, when given, replace the whole composition.
    ///
    /// Both changes land in one transaction.
    async fn update(
        &self,
        id: &RecipeId,
        fields: &RecipeFields,
        composition: Option<Vec<CompositionRow>>,
    ) -> Result<(), RecipeRepositoryError>;

    /// Delete every composition row and insert `rows` in one transaction.
    async fn replace_composition(
        &self,
        id: &RecipeId,
        rows: &[CompositionRow],
    ) -> Result<(), RecipeRepositoryError>;

    /// Fetch one recipe with its composition ordered by ingredient name.
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Look up only the author of a recipe.
    async fn find_author(&self, id: &RecipeId) -> Result<Option<UserId>, RecipeRepositoryError>;

    /// List recipes matching `filter`, newest first.
    async fn list(&self, filter: &RecipeListFilter) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Flattened `(name, unit, amount)` rows for the given recipes.
    ///
    /// Unknown recipe ids contribute nothing.
    async fn composition_lines(
        &self,
        ids: &[RecipeId],
    ) -> Result<Vec<CompositionLine>, RecipeRepositoryError>;

    /// Delete a recipe with its composition and every favourite or cart
    /// entry pointing at it. Returns `false` when it did not exist.
    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError>;
}

/// Fixture repository that accepts writes and finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeRepository;

#[async_trait]
impl RecipeRepository for FixtureRecipeRepository {
    async fn create(&self, _recipe: &NewRecipe) -> Result<(), RecipeRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        id: &RecipeId,
        _fields: &RecipeFields,
        _composition: Option<Vec<CompositionRow>>,
    ) -> Result<(), RecipeRepositoryError> {
        Err(RecipeRepositoryError::not_found(id.to_string()))
    }

    async fn replace_composition(
        &self,
        id: &RecipeId,
        _rows: &[CompositionRow],
    ) -> Result<(), RecipeRepositoryError> {
        Err(RecipeRepositoryError::not_found(id.to_string()))
    }

    async fn find_by_id(&self, _id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn find_author(&self, _id: &RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn list(&self, _filter: &RecipeListFilter) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        Ok(Vec::new())
    }

    async fn composition_lines(
        &self,
        _ids: &[RecipeId],
    ) -> Result<Vec<CompositionLine>, RecipeRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_reports_vanished_recipe_on_update() {
        let repo = FixtureRecipeRepository;
        let id = RecipeId::random();
        let fields = RecipeFields::try_new("Soup", "Boil water", 10).expect("fields");

        let err = repo
            .update(&id, &fields, None)
            .await
            .expect_err("nothing to update");

        assert_eq!(err, RecipeRepositoryError::not_found(id.to_string()));
    }

    #[rstest]
    fn missing_reference_kind_label() {
        let err = RecipeRepositoryError::missing_reference("ingredient fk");
        assert_eq!(err.kind(), "missing_reference");
    }
}
