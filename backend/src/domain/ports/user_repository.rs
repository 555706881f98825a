//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The id or username is already taken.
        Duplicate { message: String } => "user already exists: {message}",
    }
}

/// Storage for the users that own recipes and relations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with `Duplicate` on id or username clash.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Whether a user with this identifier exists.
    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Delete a user together with everything they own.
    ///
    /// Removes their recipes (with each recipe's composition and the
    /// favourites and cart entries pointing at it), every relation they hold,
    /// and every subscription targeting them, all in one transaction.
    /// Returns `false` when the user did not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}

/// Fixture repository that stores nothing and reports every user as present.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _user: &User) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn exists(&self, _id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(true)
    }

    async fn delete(&self, _id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_accepts_inserts_without_storing() {
        let repo = FixtureUserRepository;
        let user = User::try_from_strings("3fa85f64-5717-4562-b3fc-2c963f66afa6", "ada")
            .expect("valid user");

        repo.insert(&user).await.expect("fixture insert");
        let found = repo.find_by_id(user.id()).await.expect("fixture lookup");

        assert!(found.is_none());
        assert!(repo.exists(user.id()).await.expect("fixture exists"));
    }

    #[rstest]
    fn duplicate_error_formats_message() {
        let err = UserPersistenceError::duplicate("username ada");
        assert_eq!(err.to_string(), "user already exists: username ada");
        assert_eq!(err.kind(), "duplicate");
    }
}
