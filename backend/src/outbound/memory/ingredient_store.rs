//! [`IngredientRepository`] for the in-memory store.

use std::collections::HashSet;

use async_trait::async_trait;

use super::{InMemoryStore, Tables};
use crate::domain::ports::{IngredientRepository, IngredientRepositoryError};
use crate::domain::{Ingredient, IngredientDraft, IngredientId};

fn pair_exists(tables: &Tables, draft: &IngredientDraft) -> bool {
    tables.ingredients.values().any(|existing| {
        existing.name == draft.name && existing.measurement_unit == draft.measurement_unit
    })
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn insert(
        &self,
        draft: &IngredientDraft,
    ) -> Result<Ingredient, IngredientRepositoryError> {
        let mut tables = self.write().map_err(IngredientRepositoryError::connection)?;
        if pair_exists(&tables, draft) {
            return Err(IngredientRepositoryError::duplicate(
                draft.name.as_str(),
                draft.measurement_unit.as_str(),
            ));
        }
        let ingredient = Ingredient::from_draft(IngredientId::random(), draft.clone());
        tables.ingredients.insert(ingredient.id, ingredient.clone());
        Ok(ingredient)
    }

    async fn insert_ignoring_conflicts(
        &self,
        drafts: &[IngredientDraft],
    ) -> Result<usize, IngredientRepositoryError> {
        let mut tables = self.write().map_err(IngredientRepositoryError::connection)?;
        let mut seen = HashSet::new();
        let mut inserted = 0;
        for draft in drafts {
            if !seen.insert(draft) || pair_exists(&tables, draft) {
                continue;
            }
            let ingredient = Ingredient::from_draft(IngredientId::random(), draft.clone());
            tables.ingredients.insert(ingredient.id, ingredient);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn find_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let tables = self.read().map_err(IngredientRepositoryError::connection)?;
        let unique: HashSet<&IngredientId> = ids.iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| tables.ingredients.get(id).cloned())
            .collect())
    }

    async fn search_by_name_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let tables = self.read().map_err(IngredientRepositoryError::connection)?;
        let needle = prefix.to_lowercase();
        let mut matches: Vec<Ingredient> = tables
            .ingredients
            .values()
            .filter(|ingredient| ingredient.name.as_str().to_lowercase().starts_with(&needle))
            .cloned()
            .collect();
        matches.sort_by(Ingredient::display_order);
        Ok(matches)
    }

    async fn delete(&self, id: &IngredientId) -> Result<bool, IngredientRepositoryError> {
        let mut tables = self.write().map_err(IngredientRepositoryError::connection)?;
        if tables.ingredient_in_use(id) {
            return Err(IngredientRepositoryError::in_use(id.to_string()));
        }
        Ok(tables.ingredients.remove(id).is_some())
    }
}
