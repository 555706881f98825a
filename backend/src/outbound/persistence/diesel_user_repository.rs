//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{RelationKind, User, UserId};

use super::diesel_helpers::{StorageFailure, classify_diesel_error, map_pool_error_message};
use super::diesel_recipe_repository::delete_recipes_cascade;
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recipes, user_relations, users};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        StorageFailure::Connection(message) => UserPersistenceError::connection(message),
        failure if failure.is_constraint("users_pkey") => UserPersistenceError::duplicate("id"),
        failure if failure.is_constraint("users_username_key") => {
            UserPersistenceError::duplicate("username")
        }
        failure @ (StorageFailure::UniqueViolation { .. }
        | StorageFailure::ForeignKeyViolation { .. }) => {
            UserPersistenceError::query(failure.unrecognised())
        }
        StorageFailure::Query(message) => UserPersistenceError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(users::table.find(*id.as_uuid())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let user_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The row lock makes concurrent recipe and relation inserts that
        // reference this user wait for the outcome of the delete.
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let locked: Option<Uuid> = users::table
                    .find(user_id)
                    .select(users::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Ok(false);
                }

                let authored: Vec<Uuid> = recipes::table
                    .filter(recipes::author_id.eq(user_id))
                    .select(recipes::id)
                    .load(conn)
                    .await?;
                delete_recipes_cascade(conn, &authored).await?;

                diesel::delete(user_relations::table.filter(user_relations::user_id.eq(user_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    user_relations::table
                        .filter(user_relations::kind.eq(RelationKind::Subscription.as_str()))
                        .filter(user_relations::target_id.eq(user_id)),
                )
                .execute(conn)
                .await?;

                let removed = diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .await?;
                Ok(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
