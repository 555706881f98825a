//! Driving ports for favourites, cart entries, and subscriptions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Relation, RelationKind, UserId};

/// Relation mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationCommand: Send + Sync {
    /// Record a relation from `user` to `target`.
    ///
    /// # Errors
    ///
    /// - `SelfRelationForbidden` when subscribing to oneself.
    /// - `AlreadyExists` when the edge is already stored.
    /// - `NotFound` when the target does not exist.
    async fn add(
        &self,
        user: &UserId,
        kind: RelationKind,
        target: Uuid,
    ) -> Result<Relation, Error>;

    /// Remove a relation; `NotFound` when it was never stored.
    async fn remove(&self, user: &UserId, kind: RelationKind, target: Uuid) -> Result<(), Error>;
}

/// Relation reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationQuery: Send + Sync {
    /// Targets of `user`'s relations of `kind` in the order they were added.
    async fn list(&self, user: &UserId, kind: RelationKind) -> Result<Vec<Uuid>, Error>;

    /// Whether `user` holds a relation of `kind` to `target`.
    async fn contains(
        &self,
        user: &UserId,
        kind: RelationKind,
        target: Uuid,
    ) -> Result<bool, Error>;
}
