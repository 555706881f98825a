//! Driving port for reading recipes from a viewer's perspective.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Recipe, RecipeId, RecipeListFilter, UserId};

/// Recipe annotated with the viewer's relations to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    /// The recipe itself.
    pub recipe: Recipe,
    /// Whether the viewer favourited it.
    pub is_favorited: bool,
    /// Whether it sits in the viewer's shopping cart.
    pub is_in_shopping_cart: bool,
}

/// One followed author with a preview of their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    /// The followed author.
    pub author: UserId,
    /// Total number of recipes the author has published.
    pub recipes_count: usize,
    /// Newest recipes first, cut to the requested limit.
    pub recipes: Vec<Recipe>,
}

/// Recipe read use cases. Anonymous viewers pass `None` and see both flags
/// as `false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Fetch one recipe.
    async fn get_recipe(
        &self,
        viewer: Option<UserId>,
        recipe_id: &RecipeId,
    ) -> Result<RecipeView, Error>;

    /// List recipes matching `filter`, newest first.
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        filter: RecipeListFilter,
    ) -> Result<Vec<RecipeView>, Error>;

    /// Authors `user` subscribes to, in subscription order, each with their
    /// recipe count and up to `recipes_limit` of their newest recipes.
    /// `None` returns every recipe.
    async fn subscriptions_with_recipes(
        &self,
        user: &UserId,
        recipes_limit: Option<usize>,
    ) -> Result<Vec<SubscriptionView>, Error>;
}
