//! PostgreSQL-backed `RelationRepository` implementation using Diesel ORM.
//!
//! `target_id` is polymorphic and carries no foreign key. Inserts therefore
//! guard on the target inside the same statement, taking a key-share lock so
//! a concurrent delete of the target either waits for the insert or makes it
//! insert nothing.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Text, Timestamptz};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RelationRepository, RelationRepositoryError};
use crate::domain::{Relation, RelationEdge, RelationKind, RelationTarget, UserId};

use super::diesel_helpers::{StorageFailure, classify_diesel_error, map_pool_error_message};
use super::pool::{DbPool, PoolError};
use super::schema::{user_relations, users};

const PKEY: &str = "user_relations_pkey";
const USER_FKEY: &str = "user_relations_user_id_fkey";

const INSERT_RECIPE_EDGE_SQL: &str = "\
INSERT INTO user_relations (kind, user_id, target_id, created_at) \
SELECT $1, $2, $3, $4 \
WHERE EXISTS (SELECT 1 FROM recipes WHERE id = $3 FOR KEY SHARE)";

const INSERT_USER_EDGE_SQL: &str = "\
INSERT INTO user_relations (kind, user_id, target_id, created_at) \
SELECT $1, $2, $3, $4 \
WHERE EXISTS (SELECT 1 FROM users WHERE id = $3 FOR KEY SHARE)";

/// Diesel-backed implementation of the [`RelationRepository`] port.
#[derive(Clone)]
pub struct DieselRelationRepository {
    pool: DbPool,
}

impl DieselRelationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RelationRepositoryError {
    RelationRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RelationRepositoryError {
    match classify_diesel_error(error) {
        StorageFailure::Connection(message) => RelationRepositoryError::connection(message),
        StorageFailure::Query(message) => RelationRepositoryError::query(message),
        failure => RelationRepositoryError::query(failure.unrecognised()),
    }
}

fn map_insert_error(edge: &RelationEdge, error: diesel::result::Error) -> RelationRepositoryError {
    match classify_diesel_error(error) {
        failure if failure.is_constraint(PKEY) => RelationRepositoryError::duplicate_edge(edge),
        failure if failure.is_constraint(USER_FKEY) => {
            RelationRepositoryError::unknown_user(edge.user_id.to_string())
        }
        StorageFailure::Connection(message) => RelationRepositoryError::connection(message),
        StorageFailure::Query(message) => RelationRepositoryError::query(message),
        failure => RelationRepositoryError::query(failure.unrecognised()),
    }
}

fn primary_key(edge: &RelationEdge) -> (&'static str, Uuid, Uuid) {
    (edge.kind.as_str(), edge.user_id, edge.target_id)
}

#[async_trait]
impl RelationRepository for DieselRelationRepository {
    async fn insert(&self, relation: &Relation) -> Result<(), RelationRepositoryError> {
        let edge = relation.edge();
        let statement = match edge.kind.target() {
            RelationTarget::Recipe => INSERT_RECIPE_EDGE_SQL,
            RelationTarget::User => INSERT_USER_EDGE_SQL,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = sql_query(statement)
            .bind::<Text, _>(edge.kind.as_str())
            .bind::<diesel::sql_types::Uuid, _>(edge.user_id)
            .bind::<diesel::sql_types::Uuid, _>(edge.target_id)
            .bind::<Timestamptz, _>(relation.created_at)
            .execute(&mut conn)
            .await
            .map_err(|error| map_insert_error(&edge, error))?;
        if inserted > 0 {
            return Ok(());
        }

        // Nothing inserted: the target is missing. Report an unknown owner
        // first, matching the order the foreign key would have.
        let owner_exists: bool =
            diesel::select(diesel::dsl::exists(users::table.find(edge.user_id)))
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        if owner_exists {
            Err(RelationRepositoryError::missing_edge_target(&edge))
        } else {
            Err(RelationRepositoryError::unknown_user(edge.user_id.to_string()))
        }
    }

    async fn delete(&self, edge: &RelationEdge) -> Result<bool, RelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(user_relations::table.find(primary_key(edge)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn contains(&self, edge: &RelationEdge) -> Result<bool, RelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            user_relations::table.find(primary_key(edge)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_targets(
        &self,
        kind: RelationKind,
        user: &UserId,
    ) -> Result<Vec<Uuid>, RelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        user_relations::table
            .filter(user_relations::kind.eq(kind.as_str()))
            .filter(user_relations::user_id.eq(*user.as_uuid()))
            .order(user_relations::seq.asc())
            .select(user_relations::target_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
