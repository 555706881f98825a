//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`*Command`, `*Query`, [`IngredientCatalogue`]) are implemented by
//! the domain services and consumed by whatever inbound layer wraps the
//! crate.

mod macros;
pub(crate) use macros::define_port_error;

mod ingredient_catalogue;
mod ingredient_repository;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod relation_command;
mod relation_repository;
mod shopping_list_query;
mod user_repository;

#[cfg(test)]
pub use ingredient_catalogue::MockIngredientCatalogue;
pub use ingredient_catalogue::{ImportSummary, IngredientCatalogue};
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use ingredient_repository::{
    FixtureIngredientRepository, IngredientRepository, IngredientRepositoryError,
};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::{
    CreateRecipeRequest, RecipeCommand, ReplaceCompositionRequest, UpdateRecipeRequest,
};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::{RecipeQuery, RecipeView, SubscriptionView};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{
    FixtureRecipeRepository, NewRecipe, RecipeRepository, RecipeRepositoryError,
};
#[cfg(test)]
pub use relation_command::{MockRelationCommand, MockRelationQuery};
pub use relation_command::{RelationCommand, RelationQuery};
#[cfg(test)]
pub use relation_repository::MockRelationRepository;
pub use relation_repository::{
    FixtureRelationRepository, RelationRepository, RelationRepositoryError,
};
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
