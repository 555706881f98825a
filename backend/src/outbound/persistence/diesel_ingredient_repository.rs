//! PostgreSQL-backed `IngredientRepository` implementation using Diesel ORM.
//!
//! The `(name, measurement_unit)` unique constraint is the source of truth
//! for duplicates. Bulk imports lean on `ON CONFLICT DO NOTHING`, which also
//! collapses pairs repeated inside one batch.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{IngredientRepository, IngredientRepositoryError};
use crate::domain::{Ingredient, IngredientDraft, IngredientId};

use super::diesel_helpers::{
    StorageFailure, classify_diesel_error, collect_rows, like_prefix_pattern,
    map_pool_error_message,
};
use super::models::{IngredientRow, NewIngredientRow};
use super::pool::{DbPool, PoolError};
use super::schema::ingredients;

/// Rows per `INSERT` statement; three bind parameters each keeps well under
/// the PostgreSQL limit.
const IMPORT_CHUNK: usize = 1_000;

const NAME_UNIT_KEY: &str = "ingredients_name_unit_key";
const IN_USE_FKEY: &str = "recipe_ingredients_ingredient_id_fkey";

diesel::define_sql_function! {
    /// SQL `lower()`, matching the functional index on ingredient names.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of the [`IngredientRepository`] port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IngredientRepositoryError {
    IngredientRepositoryError::connection(map_pool_error_message(error))
}

fn map_storage_failure(failure: StorageFailure) -> IngredientRepositoryError {
    match failure {
        StorageFailure::Connection(message) => IngredientRepositoryError::connection(message),
        StorageFailure::Query(message) => IngredientRepositoryError::query(message),
        other => IngredientRepositoryError::query(other.unrecognised()),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> IngredientRepositoryError {
    map_storage_failure(classify_diesel_error(error))
}

fn new_row(id: Uuid, draft: &IngredientDraft) -> NewIngredientRow<'_> {
    NewIngredientRow {
        id,
        name: draft.name.as_str(),
        measurement_unit: draft.measurement_unit.as_str(),
    }
}

fn to_domain(rows: Vec<IngredientRow>) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
    collect_rows(
        rows.into_iter().map(Ingredient::try_from),
        IngredientRepositoryError::query,
    )
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn insert(
        &self,
        draft: &IngredientDraft,
    ) -> Result<Ingredient, IngredientRepositoryError> {
        let id = IngredientId::random();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(ingredients::table)
            .values(&new_row(*id.as_uuid(), draft))
            .execute(&mut conn)
            .await
            .map_err(|error| match classify_diesel_error(error) {
                failure if failure.is_constraint(NAME_UNIT_KEY) => {
                    IngredientRepositoryError::duplicate(
                        draft.name.as_str(),
                        draft.measurement_unit.as_str(),
                    )
                }
                failure => map_storage_failure(failure),
            })?;
        Ok(Ingredient::from_draft(id, draft.clone()))
    }

    async fn insert_ignoring_conflicts(
        &self,
        drafts: &[IngredientDraft],
    ) -> Result<usize, IngredientRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        if drafts.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Uuid> = drafts.iter().map(|_| Uuid::new_v4()).collect();
        let rows: Vec<NewIngredientRow<'_>> = ids
            .iter()
            .zip(drafts)
            .map(|(id, draft)| new_row(*id, draft))
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(IMPORT_CHUNK) {
                    inserted += diesel::insert_into(ingredients::table)
                        .values(chunk)
                        .on_conflict((ingredients::name, ingredients::measurement_unit))
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(&keys))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_domain(rows)
    }

    async fn search_by_name_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let pattern = like_prefix_pattern(&prefix.to_lowercase());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(lower(ingredients::name).like(pattern))
            .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_domain(rows)
    }

    async fn delete(&self, id: &IngredientId) -> Result<bool, IngredientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Composition rows keep a plain foreign key, so the delete itself
        // refuses ingredients that are still referenced.
        let removed = diesel::delete(ingredients::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|error| match classify_diesel_error(error) {
                failure if failure.is_constraint(IN_USE_FKEY) => {
                    IngredientRepositoryError::in_use(id.to_string())
                }
                failure => map_storage_failure(failure),
            })?;
        Ok(removed > 0)
    }
}
