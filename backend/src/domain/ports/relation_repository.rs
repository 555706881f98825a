//! Port for favourite, cart, and subscription edges.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Relation, RelationEdge, RelationKind, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by relation repository adapters.
    pub enum RelationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "relation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "relation repository query failed: {message}",
        /// The edge is already stored.
        Duplicate { kind: String, target: String } =>
            "{kind} relation to {target} already exists",
        /// The target recipe or user does not exist.
        MissingTarget { kind: String, target: String } =>
            "{kind} target {target} does not exist",
        /// The owning user does not exist.
        UnknownUser { user: String } =>
            "user {user} does not exist",
    }
}

impl RelationRepositoryError {
    /// `Duplicate` error for an edge.
    pub fn duplicate_edge(edge: &RelationEdge) -> Self {
        Self::duplicate(edge.kind.as_str(), edge.target_id.to_string())
    }

    /// `MissingTarget` error for an edge.
    pub fn missing_edge_target(edge: &RelationEdge) -> Self {
        Self::missing_target(edge.kind.as_str(), edge.target_id.to_string())
    }
}

/// Relation storage with atomic check-and-insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Store a relation.
    ///
    /// The existence check and the write are one atomic step: of two
    /// concurrent inserts of the same edge exactly one succeeds and the other
    /// fails with `Duplicate`. Fails with `MissingTarget` when the edge
    /// points at a recipe or user that does not exist.
    async fn insert(&self, relation: &Relation) -> Result<(), RelationRepositoryError>;

    /// Remove an edge. Returns `false` when it was not stored.
    async fn delete(&self, edge: &RelationEdge) -> Result<bool, RelationRepositoryError>;

    /// Whether the edge is stored.
    async fn contains(&self, edge: &RelationEdge) -> Result<bool, RelationRepositoryError>;

    /// Targets of `user`'s relations of `kind`, in insertion order.
    async fn list_targets(
        &self,
        kind: RelationKind,
        user: &UserId,
    ) -> Result<Vec<Uuid>, RelationRepositoryError>;
}

/// Fixture repository holding no relations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRelationRepository;

#[async_trait]
impl RelationRepository for FixtureRelationRepository {
    async fn insert(&self, _relation: &Relation) -> Result<(), RelationRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _edge: &RelationEdge) -> Result<bool, RelationRepositoryError> {
        Ok(false)
    }

    async fn contains(&self, _edge: &RelationEdge) -> Result<bool, RelationRepositoryError> {
        Ok(false)
    }

    async fn list_targets(
        &self,
        _kind: RelationKind,
        _user: &UserId,
    ) -> Result<Vec<Uuid>, RelationRepositoryError> {
        Ok(Vec::new())
    }
}
