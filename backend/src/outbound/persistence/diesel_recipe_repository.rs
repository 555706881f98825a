//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Writes that touch a recipe header and its composition rows share one
//! transaction. Replacing a composition locks the recipe row first, so two
//! concurrent replacements serialize and the later one wins whole.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{NewRecipe, RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    CompositionLine, CompositionRow, Ingredient, Recipe, RecipeFields, RecipeId,
    RecipeIngredient, RecipeListFilter, RelationKind, UserId,
};

use super::diesel_helpers::{StorageFailure, classify_diesel_error, map_pool_error_message};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeUpdate, bounded_to_db,
    stored_amount,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipes, user_relations};

const RECIPE_AUTHOR_FKEY: &str = "recipes_author_id_fkey";
const ROW_INGREDIENT_FKEY: &str = "recipe_ingredients_ingredient_id_fkey";
const RECIPE_PKEY: &str = "recipes_pkey";
const ROW_PKEY: &str = "recipe_ingredients_pkey";

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    RecipeRepositoryError::connection(map_pool_error_message(error))
}

fn map_storage_failure(failure: StorageFailure) -> RecipeRepositoryError {
    match failure {
        StorageFailure::Connection(message) => RecipeRepositoryError::connection(message),
        StorageFailure::Query(message) => RecipeRepositoryError::query(message),
        failure if failure.is_constraint(RECIPE_PKEY) => {
            RecipeRepositoryError::duplicate("recipe id already in use")
        }
        failure if failure.is_constraint(ROW_PKEY) => {
            RecipeRepositoryError::duplicate("ingredient repeated in composition")
        }
        failure if failure.is_constraint(ROW_INGREDIENT_FKEY) => {
            RecipeRepositoryError::missing_reference("ingredient")
        }
        failure => RecipeRepositoryError::query(failure.unrecognised()),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_storage_failure(classify_diesel_error(error))
}

/// Delete recipes together with their composition rows and every favourite
/// or cart edge pointing at them. Returns the number of recipes removed.
///
/// Must run inside a transaction. The recipe rows are locked first so a
/// concurrent relation insert waits and then sees them gone.
pub(super) async fn delete_recipes_cascade(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> QueryResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let locked: Vec<Uuid> = recipes::table
        .filter(recipes::id.eq_any(ids))
        .select(recipes::id)
        .for_update()
        .load(conn)
        .await?;
    if locked.is_empty() {
        return Ok(0);
    }

    diesel::delete(
        user_relations::table
            .filter(user_relations::kind.eq_any([
                RelationKind::Favorite.as_str(),
                RelationKind::Cart.as_str(),
            ]))
            .filter(user_relations::target_id.eq_any(&locked)),
    )
    .execute(conn)
    .await?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq_any(&locked)))
        .execute(conn)
        .await?;
    diesel::delete(recipes::table.filter(recipes::id.eq_any(&locked)))
        .execute(conn)
        .await
}

async fn insert_rows(
    conn: &mut AsyncPgConnection,
    recipe: &RecipeId,
    rows: &[CompositionRow],
) -> QueryResult<()> {
    let rows = RecipeIngredientRow::for_recipe(recipe, rows);
    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)
        .await
        .map(|_| ())
}

async fn replace_rows(
    conn: &mut AsyncPgConnection,
    recipe: &RecipeId,
    rows: &[CompositionRow],
) -> QueryResult<()> {
    diesel::delete(
        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(*recipe.as_uuid())),
    )
    .execute(conn)
    .await?;
    insert_rows(conn, recipe, rows).await
}

/// Lock a recipe header for the rest of the transaction.
async fn lock_recipe(conn: &mut AsyncPgConnection, recipe: &RecipeId) -> QueryResult<bool> {
    let locked: Option<Uuid> = recipes::table
        .find(*recipe.as_uuid())
        .select(recipes::id)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok(locked.is_some())
}

/// Load the headers' compositions and assemble domain recipes in header order.
async fn assemble(
    conn: &mut AsyncPgConnection,
    headers: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = headers.iter().map(|row| row.id).collect();
    let rows: Vec<(Uuid, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut compositions: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, ingredient) in rows {
        let entry = RecipeIngredient {
            ingredient: Ingredient::try_from(ingredient).map_err(RecipeRepositoryError::query)?,
            amount: stored_amount(recipe_id, amount).map_err(RecipeRepositoryError::query)?,
        };
        compositions.entry(recipe_id).or_default().push(entry);
    }

    headers
        .into_iter()
        .map(|header| {
            let fields = header.fields().map_err(RecipeRepositoryError::query)?;
            let mut ingredients = compositions.remove(&header.id).unwrap_or_default();
            Recipe::sort_ingredients(&mut ingredients);
            Ok(Recipe {
                id: header.recipe_id(),
                author: UserId::from_uuid(header.author_id),
                fields,
                created_at: header.created_at,
                ingredients,
            })
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RecipeRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let header = NewRecipeRow {
            id: *recipe.id.as_uuid(),
            author_id: *recipe.author.as_uuid(),
            name: recipe.fields.name().as_str(),
            body: recipe.fields.text(),
            cooking_time: bounded_to_db(recipe.fields.cooking_time().minutes()),
            created_at: recipe.created_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(recipes::table)
                    .values(&header)
                    .execute(conn)
                    .await?;
                insert_rows(conn, &recipe.id, &recipe.composition).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| match classify_diesel_error(error) {
            failure if failure.is_constraint(RECIPE_AUTHOR_FKEY) => {
                RecipeRepositoryError::unknown_author(recipe.author.to_string())
            }
            failure => map_storage_failure(failure),
        })
    }

    async fn update(
        &self,
        id: &RecipeId,
        fields: &RecipeFields,
        composition: Option<Vec<CompositionRow>>,
    ) -> Result<(), RecipeRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let changes = RecipeUpdate::from(fields);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    if !lock_recipe(conn, id).await? {
                        return Ok(false);
                    }
                    diesel::update(recipes::table.find(*id.as_uuid()))
                        .set(&changes)
                        .execute(conn)
                        .await?;
                    if let Some(rows) = &composition {
                        replace_rows(conn, id, rows).await?;
                    }
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if found {
            Ok(())
        } else {
            Err(RecipeRepositoryError::not_found(id.to_string()))
        }
    }

    async fn replace_composition(
        &self,
        id: &RecipeId,
        rows: &[CompositionRow],
    ) -> Result<(), RecipeRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    if !lock_recipe(conn, id).await? {
                        return Ok(false);
                    }
                    replace_rows(conn, id, rows).await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if found {
            Ok(())
        } else {
            Err(RecipeRepositoryError::not_found(id.to_string()))
        }
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let header: Option<RecipeRow> = recipes::table
            .find(*id.as_uuid())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(header) = header else {
            return Ok(None);
        };
        Ok(assemble(&mut conn, vec![header]).await?.pop())
    }

    async fn find_author(&self, id: &RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author: Option<Uuid> = recipes::table
            .find(*id.as_uuid())
            .select(recipes::author_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(author.map(UserId::from_uuid))
    }

    async fn list(&self, filter: &RecipeListFilter) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut query = recipes::table
            .select(RecipeRow::as_select())
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(author) = &filter.author {
            query = query.filter(recipes::author_id.eq(*author.as_uuid()));
        }
        for (kind, user) in [
            (RelationKind::Favorite, &filter.favorited_by),
            (RelationKind::Cart, &filter.in_cart_of),
        ] {
            if let Some(user) = user {
                query = query.filter(
                    recipes::id.eq_any(
                        user_relations::table
                            .filter(user_relations::kind.eq(kind.as_str()))
                            .filter(user_relations::user_id.eq(*user.as_uuid()))
                            .select(user_relations::target_id),
                    ),
                );
            }
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let headers: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        assemble(&mut conn, headers).await
    }

    async fn composition_lines(
        &self,
        ids: &[RecipeId],
    ) -> Result<Vec<CompositionLine>, RecipeRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, String, String, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(&keys))
            .select((
                recipe_ingredients::recipe_id,
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(recipe_id, name, unit, amount)| {
                let amount = stored_amount(recipe_id, amount).map_err(RecipeRepositoryError::query)?;
                Ok(CompositionLine::new(name, unit, amount.get()))
            })
            .collect()
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let target = [*id.as_uuid()];
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move { delete_recipes_cascade(conn, &target).await }.scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
