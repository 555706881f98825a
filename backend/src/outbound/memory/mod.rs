//! In-process entity store implementing every repository port.
//!
//! All tables sit behind one [`RwLock`]. Each mutation stages its checks and
//! applies its writes under a single write guard, so check-and-insert is
//! atomic and multi-row changes are never observed half-done. Reads take the
//! read guard. Cascades on delete are spelled out here rather than implied.
//!
//! Useful for tests and for embedding the core without PostgreSQL.

mod ingredient_store;
mod recipe_store;
mod relation_store;
mod user_store;

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    CompositionRow, Ingredient, IngredientId, Recipe, RecipeFields, RecipeId, RecipeIngredient,
    RelationEdge, RelationKind, RelationTarget, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredRecipe {
    author: UserId,
    fields: RecipeFields,
    created_at: DateTime<Utc>,
    sequence: u64,
}

#[derive(Debug, Clone, Copy)]
struct StoredRelation {
    sequence: u64,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    ingredients: HashMap<IngredientId, Ingredient>,
    recipes: HashMap<RecipeId, StoredRecipe>,
    compositions: HashMap<RecipeId, Vec<CompositionRow>>,
    relations: HashMap<RelationEdge, StoredRelation>,
    next_sequence: u64,
}

impl Tables {
    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn target_exists(&self, edge: &RelationEdge) -> bool {
        match edge.kind.target() {
            RelationTarget::Recipe => self
                .recipes
                .contains_key(&RecipeId::from_uuid(edge.target_id)),
            RelationTarget::User => self.users.contains_key(&edge.target_id),
        }
    }

    fn ingredient_in_use(&self, id: &IngredientId) -> bool {
        self.compositions
            .values()
            .flatten()
            .any(|row| row.ingredient_id == *id)
    }

    /// Remove a recipe, its composition, and every favourite or cart entry
    /// pointing at it.
    fn remove_recipe(&mut self, id: &RecipeId) -> bool {
        if self.recipes.remove(id).is_none() {
            return false;
        }
        self.compositions.remove(id);
        let target = *id.as_uuid();
        self.relations.retain(|edge, _| {
            !(edge.target_id == target
                && matches!(edge.kind, RelationKind::Favorite | RelationKind::Cart))
        });
        true
    }

    /// Remove a user with their recipes, their own relations, and every
    /// subscription targeting them.
    fn remove_user(&mut self, id: &Uuid) -> bool {
        if self.users.remove(id).is_none() {
            return false;
        }
        let authored: Vec<RecipeId> = self
            .recipes
            .iter()
            .filter(|(_, recipe)| recipe.author.as_uuid() == id)
            .map(|(recipe_id, _)| *recipe_id)
            .collect();
        for recipe_id in &authored {
            self.remove_recipe(recipe_id);
        }
        self.relations.retain(|edge, _| {
            edge.user_id != *id
                && !(edge.kind == RelationKind::Subscription && edge.target_id == *id)
        });
        true
    }

    fn assemble(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        let mut ingredients: Vec<RecipeIngredient> = self
            .compositions
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|row| match self.ingredients.get(&row.ingredient_id) {
                Some(ingredient) => Some(RecipeIngredient {
                    ingredient: ingredient.clone(),
                    amount: row.amount,
                }),
                None => {
                    warn!(
                        recipe_id = %id,
                        ingredient_id = %row.ingredient_id,
                        "composition row references a missing ingredient"
                    );
                    None
                }
            })
            .collect();
        Recipe::sort_ingredients(&mut ingredients);
        Recipe {
            id,
            author: stored.author.clone(),
            fields: stored.fields.clone(),
            created_at: stored.created_at,
            ingredients,
        }
    }
}

/// Lock failure message shared by every repository implementation.
const POISONED: &str = "in-memory store lock poisoned";

/// Entity store backed by in-process maps.
///
/// Share one instance behind an `Arc` between every service that should see
/// the same data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, &'static str> {
        self.tables.read().map_err(|_| {
            warn!("{POISONED}");
            POISONED
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, &'static str> {
        self.tables.write().map_err(|_| {
            warn!("{POISONED}");
            POISONED
        })
    }
}
