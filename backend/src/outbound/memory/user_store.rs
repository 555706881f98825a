//! [`UserRepository`] for the in-memory store.

use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.write().map_err(UserPersistenceError::connection)?;
        if tables.users.contains_key(user.id().as_uuid()) {
            return Err(UserPersistenceError::duplicate(format!("id {}", user.id())));
        }
        if tables
            .users
            .values()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate(format!(
                "username {}",
                user.username()
            )));
        }
        tables.users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.read().map_err(UserPersistenceError::connection)?;
        Ok(tables.users.get(id.as_uuid()).cloned())
    }

    async fn exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let tables = self.read().map_err(UserPersistenceError::connection)?;
        Ok(tables.users.contains_key(id.as_uuid()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.write().map_err(UserPersistenceError::connection)?;
        Ok(tables.remove_user(id.as_uuid()))
    }
}
