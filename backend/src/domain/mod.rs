//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed recipe, ingredient, relation, and
//! shopping-list model, the validation rules that guard it, and the services
//! implementing the driving ports. Adapters live in [`crate::outbound`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, Ingredient, Recipe, Relation: entities and their value types.
//! - Composition: validated ingredient list for a recipe.
//! - aggregate_shopping_list / ShoppingList: cart aggregation.
//! - RecipeCompositionService, RelationRegistryService, ShoppingListService,
//!   IngredientCatalogueService: driving port implementations.

pub mod composition;
pub mod error;
pub mod ingredient;
pub mod ingredient_catalogue_service;
mod port_errors;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod relation;
pub mod relation_service;
pub mod shopping_list;
pub mod shopping_list_service;
pub mod user;
mod validation;

pub use self::composition::{Composition, CompositionError, CompositionRow};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ingredient::{
    INGREDIENT_NAME_MAX, Ingredient, IngredientDraft, IngredientId, IngredientName,
    IngredientValidationError, MEASUREMENT_UNIT_MAX, MeasurementUnit,
};
pub use self::ingredient_catalogue_service::IngredientCatalogueService;
pub use self::recipe::{
    Amount, CompositionEntry, CookingTime, MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT,
    MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT, RECIPE_NAME_MAX, Recipe, RecipeFields, RecipeId,
    RecipeIngredient, RecipeListFilter, RecipeName, RecipeValidationError,
};
pub use self::recipe_service::RecipeCompositionService;
pub use self::relation::{
    ParseRelationKindError, Relation, RelationEdge, RelationKind, RelationTarget,
};
pub use self::relation_service::RelationRegistryService;
pub use self::shopping_list::{
    CompositionLine, ShoppingList, ShoppingListItem, aggregate_shopping_list,
};
pub use self::shopping_list_service::ShoppingListService;
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

