//! Port for the ingredient catalogue store.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientDraft, IngredientId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ingredient repository adapters.
    pub enum IngredientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ingredient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ingredient repository query failed: {message}",
        /// The `(name, unit)` pair already exists.
        Duplicate { name: String, unit: String } =>
            "ingredient already exists: {name} ({unit})",
        /// The ingredient is still referenced by a recipe.
        InUse { id: String } =>
            "ingredient {id} is used by at least one recipe",
    }
}

/// Catalogue storage keyed by `(name, measurement unit)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Insert one ingredient, failing with `Duplicate` when the pair exists.
    async fn insert(&self, draft: &IngredientDraft)
    -> Result<Ingredient, IngredientRepositoryError>;

    /// Insert many ingredients, silently skipping pairs that already exist.
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_ignoring_conflicts(
        &self,
        drafts: &[IngredientDraft],
    ) -> Result<usize, IngredientRepositoryError>;

    /// Fetch the ingredients matching `ids`. Unknown ids are omitted.
    async fn find_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Case-insensitive name prefix search ordered by name, then unit.
    async fn search_by_name_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Delete an unused ingredient.
    ///
    /// Fails with `InUse` while any recipe references it. Returns `false`
    /// when it did not exist.
    async fn delete(&self, id: &IngredientId) -> Result<bool, IngredientRepositoryError>;
}

/// Fixture catalogue that is always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIngredientRepository;

#[async_trait]
impl IngredientRepository for FixtureIngredientRepository {
    async fn insert(
        &self,
        draft: &IngredientDraft,
    ) -> Result<Ingredient, IngredientRepositoryError> {
        Ok(Ingredient::from_draft(IngredientId::random(), draft.clone()))
    }

    async fn insert_ignoring_conflicts(
        &self,
        _drafts: &[IngredientDraft],
    ) -> Result<usize, IngredientRepositoryError> {
        Ok(0)
    }

    async fn find_by_ids(
        &self,
        _ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        Ok(Vec::new())
    }

    async fn search_by_name_prefix(
        &self,
        _prefix: &str,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &IngredientId) -> Result<bool, IngredientRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_echoes_inserted_draft() {
        let repo = FixtureIngredientRepository;
        let draft = IngredientDraft::try_new("flour", "g").expect("draft");

        let ingredient = repo.insert(&draft).await.expect("fixture insert");

        assert_eq!(ingredient.name, draft.name);
        assert!(
            repo.find_by_ids(&[ingredient.id])
                .await
                .expect("fixture lookup")
                .is_empty()
        );
    }

    #[rstest]
    fn duplicate_error_names_the_pair() {
        let err = IngredientRepositoryError::duplicate("flour", "g");
        assert_eq!(err.to_string(), "ingredient already exists: flour (g)");
    }
}
