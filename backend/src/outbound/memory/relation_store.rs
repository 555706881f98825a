//! [`RelationRepository`] for the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use super::{InMemoryStore, StoredRelation};
use crate::domain::ports::{RelationRepository, RelationRepositoryError};
use crate::domain::{Relation, RelationEdge, RelationKind, UserId};

#[async_trait]
impl RelationRepository for InMemoryStore {
    async fn insert(&self, relation: &Relation) -> Result<(), RelationRepositoryError> {
        let edge = relation.edge();
        let mut tables = self.write().map_err(RelationRepositoryError::connection)?;
        if !tables.users.contains_key(&edge.user_id) {
            return Err(RelationRepositoryError::unknown_user(edge.user_id.to_string()));
        }
        if tables.relations.contains_key(&edge) {
            return Err(RelationRepositoryError::duplicate_edge(&edge));
        }
        if !tables.target_exists(&edge) {
            return Err(RelationRepositoryError::missing_edge_target(&edge));
        }
        if edge.kind.forbids_self_relation() && edge.is_self_relation() {
            return Err(RelationRepositoryError::query(format!(
                "{} relation may not target its own user",
                edge.kind
            )));
        }

        let sequence = tables.next_sequence();
        tables.relations.insert(edge, StoredRelation { sequence });
        Ok(())
    }

    async fn delete(&self, edge: &RelationEdge) -> Result<bool, RelationRepositoryError> {
        let mut tables = self.write().map_err(RelationRepositoryError::connection)?;
        Ok(tables.relations.remove(edge).is_some())
    }

    async fn contains(&self, edge: &RelationEdge) -> Result<bool, RelationRepositoryError> {
        let tables = self.read().map_err(RelationRepositoryError::connection)?;
        Ok(tables.relations.contains_key(edge))
    }

    async fn list_targets(
        &self,
        kind: RelationKind,
        user: &UserId,
    ) -> Result<Vec<Uuid>, RelationRepositoryError> {
        let tables = self.read().map_err(RelationRepositoryError::connection)?;
        let mut targets: Vec<(u64, Uuid)> = tables
            .relations
            .iter()
            .filter(|(edge, _)| edge.kind == kind && edge.user_id == *user.as_uuid())
            .map(|(edge, stored)| (stored.sequence, edge.target_id))
            .collect();
        targets.sort_unstable_by_key(|(sequence, _)| *sequence);
        Ok(targets.into_iter().map(|(_, target)| target).collect())
    }
}
