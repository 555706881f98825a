//! [`RecipeRepository`] for the in-memory store.

use std::collections::HashSet;

use async_trait::async_trait;

use super::{InMemoryStore, StoredRecipe, Tables};
use crate::domain::ports::{NewRecipe, RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    CompositionLine, CompositionRow, Recipe, RecipeFields, RecipeId, RecipeListFilter,
    RelationEdge, UserId,
};

/// Reject rows that repeat an ingredient or reference a missing one.
fn check_rows(tables: &Tables, rows: &[CompositionRow]) -> Result<(), RecipeRepositoryError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.ingredient_id) {
            return Err(RecipeRepositoryError::duplicate(format!(
                "ingredient {} repeated in composition",
                row.ingredient_id
            )));
        }
        if !tables.ingredients.contains_key(&row.ingredient_id) {
            return Err(RecipeRepositoryError::missing_reference(format!(
                "ingredient {}",
                row.ingredient_id
            )));
        }
    }
    Ok(())
}

fn matches_filter(
    tables: &Tables,
    id: RecipeId,
    stored: &StoredRecipe,
    filter: &RecipeListFilter,
) -> bool {
    let related = |user: &UserId, edge: fn(&UserId, RecipeId) -> RelationEdge| {
        tables.relations.contains_key(&edge(user, id))
    };
    filter
        .author
        .as_ref()
        .is_none_or(|author| author.as_uuid() == stored.author.as_uuid())
        && filter
            .favorited_by
            .as_ref()
            .is_none_or(|user| related(user, RelationEdge::favorite))
        && filter
            .in_cart_of
            .as_ref()
            .is_none_or(|user| related(user, RelationEdge::cart))
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RecipeRepositoryError> {
        let mut tables = self.write().map_err(RecipeRepositoryError::connection)?;
        if !tables.users.contains_key(recipe.author.as_uuid()) {
            return Err(RecipeRepositoryError::unknown_author(recipe.author.to_string()));
        }
        if tables.recipes.contains_key(&recipe.id) {
            return Err(RecipeRepositoryError::duplicate(format!(
                "recipe {} already exists",
                recipe.id
            )));
        }
        check_rows(&tables, &recipe.composition)?;

        let sequence = tables.next_sequence();
        tables.recipes.insert(
            recipe.id,
            StoredRecipe {
                author: recipe.author.clone(),
                fields: recipe.fields.clone(),
                created_at: recipe.created_at,
                sequence,
            },
        );
        tables
            .compositions
            .insert(recipe.id, recipe.composition.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &RecipeId,
        fields: &RecipeFields,
        composition: Option<Vec<CompositionRow>>,
    ) -> Result<(), RecipeRepositoryError> {
        let mut tables = self.write().map_err(RecipeRepositoryError::connection)?;
        if !tables.recipes.contains_key(id) {
            return Err(RecipeRepositoryError::not_found(id.to_string()));
        }
        if let Some(rows) = &composition {
            check_rows(&tables, rows)?;
        }

        if let Some(stored) = tables.recipes.get_mut(id) {
            stored.fields = fields.clone();
        }
        if let Some(rows) = composition {
            tables.compositions.insert(*id, rows);
        }
        Ok(())
    }

    async fn replace_composition(
        &self,
        id: &RecipeId,
        rows: &[CompositionRow],
    ) -> Result<(), RecipeRepositoryError> {
        let mut tables = self.write().map_err(RecipeRepositoryError::connection)?;
        if !tables.recipes.contains_key(id) {
            return Err(RecipeRepositoryError::not_found(id.to_string()));
        }
        check_rows(&tables, rows)?;
        tables.compositions.insert(*id, rows.to_vec());
        Ok(())
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let tables = self.read().map_err(RecipeRepositoryError::connection)?;
        Ok(tables
            .recipes
            .get(id)
            .map(|stored| tables.assemble(*id, stored)))
    }

    async fn find_author(&self, id: &RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        let tables = self.read().map_err(RecipeRepositoryError::connection)?;
        Ok(tables.recipes.get(id).map(|stored| stored.author.clone()))
    }

    async fn list(&self, filter: &RecipeListFilter) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let tables = self.read().map_err(RecipeRepositoryError::connection)?;
        let mut selected: Vec<(&RecipeId, &StoredRecipe)> = tables
            .recipes
            .iter()
            .filter(|(id, stored)| matches_filter(&tables, **id, stored, filter))
            .collect();
        selected.sort_by(|(_, left), (_, right)| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(right.sequence.cmp(&left.sequence))
        });
        Ok(selected
            .into_iter()
            .map(|(id, stored)| tables.assemble(*id, stored))
            .collect())
    }

    async fn composition_lines(
        &self,
        ids: &[RecipeId],
    ) -> Result<Vec<CompositionLine>, RecipeRepositoryError> {
        let tables = self.read().map_err(RecipeRepositoryError::connection)?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.compositions.get(id))
            .flatten()
            .filter_map(|row| {
                tables.ingredients.get(&row.ingredient_id).map(|ingredient| {
                    CompositionLine::new(
                        ingredient.name.as_str(),
                        ingredient.measurement_unit.as_str(),
                        row.amount.get(),
                    )
                })
            })
            .collect())
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut tables = self.write().map_err(RecipeRepositoryError::connection)?;
        Ok(tables.remove_recipe(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::IngredientRepository;
    use crate::domain::{Amount, Ingredient, IngredientId};
    use crate::test_support::clock::fixture_timestamp;
    use crate::test_support::seed;
    use chrono::TimeDelta;
    use rstest::rstest;

    fn row(ingredient: &Ingredient, amount: i64) -> CompositionRow {
        CompositionRow {
            ingredient_id: ingredient.id,
            amount: Amount::new(amount).expect("amount"),
        }
    }

    fn new_recipe(author: &UserId, rows: Vec<CompositionRow>, minutes: i64) -> NewRecipe {
        NewRecipe {
            id: RecipeId::random(),
            author: author.clone(),
            fields: RecipeFields::try_new("Stew", "Simmer.", 90).expect("fields"),
            created_at: fixture_timestamp() + TimeDelta::minutes(minutes),
            composition: rows,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_with_missing_ingredient_leaves_nothing_behind() {
        let store = InMemoryStore::new();
        let author = seed::user(&store, "cook").await;
        let carrot = seed::ingredient(&store, "carrot", "pcs").await;
        let ghost = Ingredient {
            id: IngredientId::random(),
            ..carrot.clone()
        };
        let recipe = new_recipe(&author, vec![row(&carrot, 2), row(&ghost, 1)], 0);

        let error = store.create(&recipe).await.expect_err("missing reference");

        assert_eq!(error.kind(), "missing_reference");
        assert!(store.find_by_id(&recipe.id).await.expect("lookup").is_none());
        assert!(
            store
                .composition_lines(&[recipe.id])
                .await
                .expect("lines")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn create_requires_existing_author() {
        let store = InMemoryStore::new();
        let leek = seed::ingredient(&store, "leek", "pcs").await;

        let error = store
            .create(&new_recipe(&UserId::random(), vec![row(&leek, 1)], 0))
            .await
            .expect_err("unknown author");

        assert_eq!(error.kind(), "unknown_author");
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_fields_and_optional_rows() {
        let store = InMemoryStore::new();
        let author = seed::user(&store, "cook").await;
        let onion = seed::ingredient(&store, "onion", "pcs").await;
        let garlic = seed::ingredient(&store, "garlic", "clove").await;
        let recipe = new_recipe(&author, vec![row(&onion, 1)], 0);
        store.create(&recipe).await.expect("created");

        let renamed = RecipeFields::try_new("Soup", "Blend.", 30).expect("fields");
        store
            .update(&recipe.id, &renamed, None)
            .await
            .expect("fields only");
        let kept = store.find_by_id(&recipe.id).await.expect("lookup").expect("recipe");
        assert_eq!(kept.fields, renamed);
        assert_eq!(kept.ingredients.len(), 1);

        store
            .update(&recipe.id, &renamed, Some(vec![row(&garlic, 3)]))
            .await
            .expect("fields and rows");
        let replaced = store.find_by_id(&recipe.id).await.expect("lookup").expect("recipe");
        assert_eq!(replaced.ingredients[0].ingredient, garlic);
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_newest_first_and_filters_by_author() {
        let store = InMemoryStore::new();
        let ana = seed::user(&store, "ana").await;
        let bo = seed::user(&store, "bo").await;
        let rice = seed::ingredient(&store, "rice", "g").await;
        let older = new_recipe(&ana, vec![row(&rice, 100)], 0);
        let newer = new_recipe(&ana, vec![row(&rice, 200)], 5);
        let other = new_recipe(&bo, vec![row(&rice, 300)], 10);
        for recipe in [&older, &newer, &other] {
            store.create(recipe).await.expect("created");
        }

        let all: Vec<_> = store
            .list(&RecipeListFilter::default())
            .await
            .expect("list")
            .into_iter()
            .map(|recipe| recipe.id)
            .collect();
        assert_eq!(all, [other.id, newer.id, older.id]);

        let by_ana = store
            .list(&RecipeListFilter {
                author: Some(ana),
                ..RecipeListFilter::default()
            })
            .await
            .expect("filtered list");
        assert_eq!(by_ana.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn composition_lines_skip_unknown_recipes() {
        let store = InMemoryStore::new();
        let author = seed::user(&store, "cook").await;
        let egg = seed::ingredient(&store, "egg", "pcs").await;
        let recipe = new_recipe(&author, vec![row(&egg, 2)], 0);
        store.create(&recipe).await.expect("created");

        let lines = store
            .composition_lines(&[recipe.id, RecipeId::random()])
            .await
            .expect("lines");

        assert_eq!(lines, [CompositionLine::new("egg", "pcs", 2)]);
        // Deleting an in-use ingredient is refused.
        assert!(IngredientRepository::delete(&store, &egg.id).await.is_err());
    }
}
