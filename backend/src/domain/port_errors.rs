//! Translation of driven-port failures into domain errors.
//!
//! Connection failures surface as `ServiceUnavailable` and query failures as
//! `InternalError`. Constraint failures map to the same code a caller would
//! get from a pre-check, so a lost race is indistinguishable from a plain
//! rejection.

use tracing::debug;

use super::Error;
use super::ports::{
    IngredientRepositoryError, RecipeRepositoryError, RelationRepositoryError,
    UserPersistenceError,
};

impl From<RecipeRepositoryError> for Error {
    fn from(error: RecipeRepositoryError) -> Self {
        debug!(kind = error.kind(), %error, "recipe repository call failed");
        match error {
            RecipeRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("recipe repository unavailable: {message}"))
            }
            RecipeRepositoryError::Query { message } => {
                Error::internal(format!("recipe repository error: {message}"))
            }
            RecipeRepositoryError::Duplicate { message } => Error::constraint_violation(message),
            RecipeRepositoryError::UnknownAuthor { author } => {
                Error::not_found(format!("user {author} not found"))
            }
            RecipeRepositoryError::MissingReference { message } => {
                Error::unknown_ingredient(format!("ingredient vanished during write: {message}"))
            }
            RecipeRepositoryError::NotFound { id } => {
                Error::not_found(format!("recipe {id} not found"))
            }
        }
    }
}

impl From<IngredientRepositoryError> for Error {
    fn from(error: IngredientRepositoryError) -> Self {
        debug!(kind = error.kind(), %error, "ingredient repository call failed");
        let message = error.to_string();
        match error {
            IngredientRepositoryError::Connection { .. } => Error::service_unavailable(message),
            IngredientRepositoryError::Query { .. } => Error::internal(message),
            IngredientRepositoryError::Duplicate { .. } | IngredientRepositoryError::InUse { .. } => {
                Error::constraint_violation(message)
            }
        }
    }
}

impl From<RelationRepositoryError> for Error {
    fn from(error: RelationRepositoryError) -> Self {
        debug!(kind = error.kind(), %error, "relation repository call failed");
        let message = error.to_string();
        match error {
            RelationRepositoryError::Connection { .. } => Error::service_unavailable(message),
            RelationRepositoryError::Query { .. } => Error::internal(message),
            RelationRepositoryError::Duplicate { .. } => Error::already_exists(message),
            RelationRepositoryError::MissingTarget { .. }
            | RelationRepositoryError::UnknownUser { .. } => Error::not_found(message),
        }
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        debug!(kind = error.kind(), %error, "user repository call failed");
        let message = error.to_string();
        match error {
            UserPersistenceError::Connection { .. } => Error::service_unavailable(message),
            UserPersistenceError::Query { .. } => Error::internal(message),
            UserPersistenceError::Duplicate { .. } => Error::constraint_violation(message),
        }
    }
}
