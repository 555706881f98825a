//! Ingredient catalogue service: search, single insert, and bulk import.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{ImportSummary, IngredientCatalogue, IngredientRepository};
use crate::domain::{Ingredient, IngredientDraft};

/// Service implementing [`IngredientCatalogue`].
#[derive(Clone)]
pub struct IngredientCatalogueService<I> {
    ingredients: Arc<I>,
}

impl<I> IngredientCatalogueService<I> {
    /// Create a new service over the ingredient repository.
    pub fn new(ingredients: Arc<I>) -> Self {
        Self { ingredients }
    }
}

#[async_trait]
impl<I> IngredientCatalogue for IngredientCatalogueService<I>
where
    I: IngredientRepository,
{
    async fn search(&self, prefix: &str) -> Result<Vec<Ingredient>, Error> {
        Ok(self.ingredients.search_by_name_prefix(prefix.trim()).await?)
    }

    async fn create_ingredient(&self, draft: IngredientDraft) -> Result<Ingredient, Error> {
        let ingredient = self.ingredients.insert(&draft).await?;
        info!(ingredient_id = %ingredient.id, name = %ingredient.name, "ingredient created");
        Ok(ingredient)
    }

    async fn import(&self, drafts: Vec<IngredientDraft>) -> Result<ImportSummary, Error> {
        if drafts.is_empty() {
            return Ok(ImportSummary::default());
        }
        let inserted = self.ingredients.insert_ignoring_conflicts(&drafts).await?;
        let summary = ImportSummary {
            submitted: drafts.len(),
            inserted,
        };
        info!(
            submitted = summary.submitted,
            inserted = summary.inserted,
            skipped = summary.skipped(),
            "ingredient import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{IngredientRepositoryError, MockIngredientRepository};

    #[tokio::test]
    async fn search_trims_the_prefix() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_search_by_name_prefix()
            .withf(|prefix: &str| prefix == "fl")
            .return_once(|_| Ok(Vec::new()));

        IngredientCatalogueService::new(Arc::new(repo))
            .search("  fl ")
            .await
            .expect("search succeeds");
    }

    #[tokio::test]
    async fn import_reports_inserted_count() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_insert_ignoring_conflicts()
            .withf(|drafts: &[IngredientDraft]| drafts.len() == 3)
            .return_once(|_| Ok(2));
        let drafts = ["flour", "salt", "sugar"]
            .into_iter()
            .map(|name| IngredientDraft::try_new(name, "g").expect("draft"))
            .collect();

        let summary = IngredientCatalogueService::new(Arc::new(repo))
            .import(drafts)
            .await
            .expect("import succeeds");

        assert_eq!(summary.skipped(), 1);
    }

    #[tokio::test]
    async fn empty_import_does_not_touch_storage() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_insert_ignoring_conflicts().never();

        let summary = IngredientCatalogueService::new(Arc::new(repo))
            .import(Vec::new())
            .await
            .expect("nothing to import");

        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn duplicate_ingredient_is_a_constraint_violation() {
        let mut repo = MockIngredientRepository::new();
        repo.expect_insert()
            .return_once(|_| Err(IngredientRepositoryError::duplicate("flour", "g")));

        let error = IngredientCatalogueService::new(Arc::new(repo))
            .create_ingredient(IngredientDraft::try_new("flour", "g").expect("draft"))
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::ConstraintViolation);
    }
}
