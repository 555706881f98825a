//! Shopping list aggregation service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{RecipeRepository, RelationRepository, ShoppingListQuery};
use crate::domain::{Error, RecipeId, RelationKind, ShoppingList, UserId, aggregate_shopping_list};

/// Read-only service computing a user's consolidated shopping list.
#[derive(Clone)]
pub struct ShoppingListService<L, R> {
    relations: Arc<L>,
    recipes: Arc<R>,
}

impl<L, R> ShoppingListService<L, R> {
    /// Create a new service over the relation and recipe repositories.
    pub fn new(relations: Arc<L>, recipes: Arc<R>) -> Self {
        Self { relations, recipes }
    }
}

#[async_trait]
impl<L, R> ShoppingListQuery for ShoppingListService<L, R>
where
    L: RelationRepository,
    R: RecipeRepository,
{
    async fn shopping_list(&self, user: &UserId) -> Result<ShoppingList, Error> {
        let cart: Vec<RecipeId> = self
            .relations
            .list_targets(RelationKind::Cart, user)
            .await?
            .into_iter()
            .map(RecipeId::from_uuid)
            .collect();
        if cart.is_empty() {
            return Ok(ShoppingList::default());
        }

        let lines = self.recipes.composition_lines(&cart).await?;
        let list = aggregate_shopping_list(lines);
        debug!(user = %user, recipes = cart.len(), items = list.len(), "shopping list built");
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompositionLine;
    use crate::domain::ports::{
        FixtureRelationRepository, MockRecipeRepository, MockRelationRepository,
    };
    use uuid::Uuid;

    #[tokio::test]
    async fn empty_cart_skips_recipe_lookup() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_composition_lines().never();
        let service = ShoppingListService::new(Arc::new(FixtureRelationRepository), Arc::new(recipes));

        let list = service
            .shopping_list(&UserId::random())
            .await
            .expect("empty list");

        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn aggregates_lines_across_cart_recipes() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut relations = MockRelationRepository::new();
        relations
            .expect_list_targets()
            .withf(|kind, _| *kind == RelationKind::Cart)
            .return_once(move |_, _| Ok(vec![first, second]));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_composition_lines()
            .withf(move |ids: &[RecipeId]| {
                ids == [RecipeId::from_uuid(first), RecipeId::from_uuid(second)]
            })
            .return_once(|_| {
                Ok(vec![
                    CompositionLine::new("Flour", "g", 200),
                    CompositionLine::new("Salt", "tsp", 1),
                    CompositionLine::new("Flour", "g", 300),
                ])
            });

        let service = ShoppingListService::new(Arc::new(relations), Arc::new(recipes));
        let list = service
            .shopping_list(&UserId::random())
            .await
            .expect("list built");

        let totals: Vec<_> = list
            .items()
            .iter()
            .map(|item| (item.name.as_str(), item.unit.as_str(), item.total_amount))
            .collect();
        assert_eq!(totals, [("Flour", "g", 500), ("Salt", "tsp", 1)]);
    }
}
