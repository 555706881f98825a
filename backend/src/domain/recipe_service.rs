//! Recipe composition service.
//!
//! Implements [`RecipeCommand`] and [`RecipeQuery`]. Writes follow one
//! pipeline: validate the composition in memory, check ownership, confirm
//! every referenced ingredient exists, then hand the whole change to the
//! repository as a single atomic call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{
    CreateRecipeRequest, IngredientRepository, NewRecipe, RecipeCommand, RecipeQuery,
    RecipeRepository, RecipeView, RelationRepository, ReplaceCompositionRequest,
    SubscriptionView, UpdateRecipeRequest,
};
use crate::domain::{
    Composition, Error, Ingredient, IngredientId, Recipe, RecipeId, RecipeIngredient,
    RecipeListFilter, RelationEdge, RelationKind, UserId,
};

/// Service owning recipe authoring and reads.
#[derive(Clone)]
pub struct RecipeCompositionService<R, I, L> {
    recipes: Arc<R>,
    ingredients: Arc<I>,
    relations: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<R, I, L> RecipeCompositionService<R, I, L> {
    /// Create a new service with the given repositories and clock.
    pub fn new(
        recipes: Arc<R>,
        ingredients: Arc<I>,
        relations: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipes,
            ingredients,
            relations,
            clock,
        }
    }
}

impl<R, I, L> RecipeCompositionService<R, I, L>
where
    R: RecipeRepository,
    I: IngredientRepository,
    L: RelationRepository,
{
    /// Resolve every ingredient of `composition`, failing on the first id
    /// (in input order) that the catalogue does not know.
    async fn resolve_ingredients(
        &self,
        composition: &Composition,
    ) -> Result<HashMap<IngredientId, Ingredient>, Error> {
        let ids = composition.ingredient_ids();
        let found: HashMap<IngredientId, Ingredient> = self
            .ingredients
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|ingredient| (ingredient.id, ingredient))
            .collect();

        if let Some(missing) = ids.iter().find(|id| !found.contains_key(id)) {
            return Err(Error::unknown_ingredient(format!(
                "ingredient {missing} does not exist"
            ))
            .with_details(json!({ "ingredientId": missing })));
        }
        Ok(found)
    }

    async fn ensure_owner(&self, actor: &UserId, recipe_id: &RecipeId) -> Result<(), Error> {
        let author = self
            .recipes
            .find_author(recipe_id)
            .await?
            .ok_or_else(|| Self::recipe_not_found(recipe_id))?;
        if author.as_uuid() != actor.as_uuid() {
            return Err(Error::forbidden(format!(
                "user {actor} may not modify recipe {recipe_id}"
            )));
        }
        Ok(())
    }

    async fn load_recipe(&self, recipe_id: &RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| Self::recipe_not_found(recipe_id))
    }

    fn recipe_not_found(recipe_id: &RecipeId) -> Error {
        Error::not_found(format!("recipe {recipe_id} not found"))
            .with_details(json!({ "recipeId": recipe_id }))
    }

    fn assemble_composition(
        composition: &Composition,
        resolved: &HashMap<IngredientId, Ingredient>,
    ) -> Vec<RecipeIngredient> {
        let mut lines: Vec<RecipeIngredient> = composition
            .rows()
            .iter()
            .filter_map(|row| {
                resolved.get(&row.ingredient_id).map(|ingredient| RecipeIngredient {
                    ingredient: ingredient.clone(),
                    amount: row.amount,
                })
            })
            .collect();
        Recipe::sort_ingredients(&mut lines);
        lines
    }

    async fn viewer_targets(
        &self,
        viewer: Option<&UserId>,
        kind: RelationKind,
    ) -> Result<HashSet<Uuid>, Error> {
        match viewer {
            Some(user) => Ok(self
                .relations
                .list_targets(kind, user)
                .await?
                .into_iter()
                .collect()),
            None => Ok(HashSet::new()),
        }
    }
}

#[async_trait]
impl<R, I, L> RecipeCommand for RecipeCompositionService<R, I, L>
where
    R: RecipeRepository,
    I: IngredientRepository,
    L: RelationRepository,
{
    async fn create_recipe(&self, request: CreateRecipeRequest) -> Result<Recipe, Error> {
        let CreateRecipeRequest {
            author,
            fields,
            composition,
        } = request;
        let composition = Composition::try_from_entries(&composition)?;
        let resolved = self.resolve_ingredients(&composition).await?;

        let new_recipe = NewRecipe {
            id: RecipeId::random(),
            author,
            fields,
            created_at: self.clock.utc(),
            composition: composition.rows().to_vec(),
        };
        self.recipes.create(&new_recipe).await?;

        info!(
            recipe_id = %new_recipe.id,
            author = %new_recipe.author,
            ingredients = composition.rows().len(),
            "recipe created"
        );

        Ok(Recipe {
            ingredients: Self::assemble_composition(&composition, &resolved),
            id: new_recipe.id,
            author: new_recipe.author,
            fields: new_recipe.fields,
            created_at: new_recipe.created_at,
        })
    }

    async fn replace_composition(
        &self,
        request: ReplaceCompositionRequest,
    ) -> Result<Recipe, Error> {
        let composition = Composition::try_from_entries(&request.composition)?;
        self.ensure_owner(&request.actor, &request.recipe_id).await?;
        self.resolve_ingredients(&composition).await?;

        self.recipes
            .replace_composition(&request.recipe_id, composition.rows())
            .await?;

        info!(
            recipe_id = %request.recipe_id,
            ingredients = composition.rows().len(),
            "recipe composition replaced"
        );
        self.load_recipe(&request.recipe_id).await
    }

    async fn update_recipe(&self, request: UpdateRecipeRequest) -> Result<Recipe, Error> {
        let composition = request
            .composition
            .as_deref()
            .map(Composition::try_from_entries)
            .transpose()?;
        self.ensure_owner(&request.actor, &request.recipe_id).await?;
        if let Some(composition) = &composition {
            self.resolve_ingredients(composition).await?;
        }

        let replaced = composition.is_some();
        self.recipes
            .update(
                &request.recipe_id,
                &request.fields,
                composition.map(Composition::into_rows),
            )
            .await?;

        info!(
            recipe_id = %request.recipe_id,
            composition_replaced = replaced,
            "recipe updated"
        );
        self.load_recipe(&request.recipe_id).await
    }

    async fn delete_recipe(&self, actor: &UserId, recipe_id: &RecipeId) -> Result<(), Error> {
        self.ensure_owner(actor, recipe_id).await?;
        if !self.recipes.delete(recipe_id).await? {
            return Err(Self::recipe_not_found(recipe_id));
        }
        info!(recipe_id = %recipe_id, actor = %actor, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, I, L> RecipeQuery for RecipeCompositionService<R, I, L>
where
    R: RecipeRepository,
    I: IngredientRepository,
    L: RelationRepository,
{
    async fn get_recipe(
        &self,
        viewer: Option<UserId>,
        recipe_id: &RecipeId,
    ) -> Result<RecipeView, Error> {
        let recipe = self.load_recipe(recipe_id).await?;
        let (is_favorited, is_in_shopping_cart) = match &viewer {
            Some(user) => (
                self.relations
                    .contains(&RelationEdge::favorite(user, recipe.id))
                    .await?,
                self.relations
                    .contains(&RelationEdge::cart(user, recipe.id))
                    .await?,
            ),
            None => (false, false),
        };
        Ok(RecipeView {
            recipe,
            is_favorited,
            is_in_shopping_cart,
        })
    }

    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        filter: RecipeListFilter,
    ) -> Result<Vec<RecipeView>, Error> {
        let recipes = self.recipes.list(&filter).await?;
        let favorites = self
            .viewer_targets(viewer.as_ref(), RelationKind::Favorite)
            .await?;
        let cart = self
            .viewer_targets(viewer.as_ref(), RelationKind::Cart)
            .await?;

        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeView {
                is_favorited: favorites.contains(recipe.id.as_uuid()),
                is_in_shopping_cart: cart.contains(recipe.id.as_uuid()),
                recipe,
            })
            .collect())
    }

    async fn subscriptions_with_recipes(
        &self,
        user: &UserId,
        recipes_limit: Option<usize>,
    ) -> Result<Vec<SubscriptionView>, Error> {
        let authors = self
            .relations
            .list_targets(RelationKind::Subscription, user)
            .await?;

        let mut views = Vec::with_capacity(authors.len());
        for author in authors.into_iter().map(UserId::from_uuid) {
            let mut recipes = self
                .recipes
                .list(&RecipeListFilter {
                    author: Some(author.clone()),
                    ..RecipeListFilter::default()
                })
                .await?;
            let recipes_count = recipes.len();
            if let Some(limit) = recipes_limit {
                recipes.truncate(limit);
            }
            views.push(SubscriptionView {
                author,
                recipes_count,
                recipes,
            });
        }
        debug!(user = %user, authors = views.len(), "subscriptions listed");
        Ok(views)
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
