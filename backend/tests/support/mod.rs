//! Shared wiring for integration suites: every service over one in-memory
//! store.
#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use std::sync::Arc;

use chrono::TimeDelta;
use foodgram::domain::ports::{
    CreateRecipeRequest, IngredientCatalogue, RecipeCommand, ShoppingListQuery,
};
use foodgram::domain::{
    CompositionEntry, Ingredient, IngredientCatalogueService, Recipe, RecipeCompositionService,
    RecipeFields, RelationRegistryService, ShoppingList, ShoppingListService, UserId,
};
use foodgram::outbound::memory::InMemoryStore;
use foodgram::test_support::clock::{SteppingClock, fixture_timestamp};
use foodgram::test_support::seed;

pub type Recipes = RecipeCompositionService<InMemoryStore, InMemoryStore, InMemoryStore>;
pub type Relations = RelationRegistryService<InMemoryStore>;
pub type ShoppingLists = ShoppingListService<InMemoryStore, InMemoryStore>;
pub type Catalogue = IngredientCatalogueService<InMemoryStore>;

/// Services sharing one store and one stepping clock.
pub struct App {
    pub store: Arc<InMemoryStore>,
    pub recipes: Recipes,
    pub relations: Relations,
    pub shopping_lists: ShoppingLists,
    pub catalogue: Catalogue,
}

impl App {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(SteppingClock::new(
            fixture_timestamp(),
            TimeDelta::seconds(1),
        ));
        Self {
            recipes: RecipeCompositionService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                clock.clone(),
            ),
            relations: RelationRegistryService::new(Arc::clone(&store), clock),
            shopping_lists: ShoppingListService::new(Arc::clone(&store), Arc::clone(&store)),
            catalogue: IngredientCatalogueService::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn user(&self, username: &str) -> UserId {
        seed::user(self.store.as_ref(), username).await
    }

    pub async fn ingredient(&self, name: &str, unit: &str) -> Ingredient {
        seed::ingredient(self.store.as_ref(), name, unit).await
    }

    /// Publish a recipe with the given `(ingredient, amount)` rows.
    pub async fn recipe(
        &self,
        author: &UserId,
        name: &str,
        rows: &[(&Ingredient, i64)],
    ) -> Recipe {
        self.recipes
            .create_recipe(CreateRecipeRequest {
                author: author.clone(),
                fields: RecipeFields::try_new(name, "Cook it.", 30).expect("valid fields"),
                composition: entries(rows),
            })
            .await
            .expect("recipe created")
    }

    /// Names returned by a catalogue prefix search.
    pub async fn catalogue_names(&self, prefix: &str) -> Vec<String> {
        self.catalogue
            .search(prefix)
            .await
            .expect("catalogue search")
            .into_iter()
            .map(|ingredient| ingredient.name.as_str().to_owned())
            .collect()
    }

    pub async fn shopping_lists_for(&self, user: &UserId) -> ShoppingList {
        self.shopping_lists
            .shopping_list(user)
            .await
            .expect("shopping list")
    }
}

pub fn entries(rows: &[(&Ingredient, i64)]) -> Vec<CompositionEntry> {
    rows.iter()
        .map(|(ingredient, amount)| CompositionEntry::new(ingredient.id, *amount))
        .collect()
}
