//! Relation registry service.
//!
//! One implementation serves favourites, cart entries, and subscriptions.
//! Duplicate detection is left to the repository's atomic insert, so two
//! racing adds resolve to one success and one `AlreadyExists`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{RelationCommand, RelationQuery, RelationRepository};
use crate::domain::{Error, Relation, RelationEdge, RelationKind, UserId};

/// Service implementing the relation driving ports.
#[derive(Clone)]
pub struct RelationRegistryService<L> {
    relations: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> RelationRegistryService<L> {
    /// Create a new service over the given repository.
    pub fn new(relations: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { relations, clock }
    }
}

fn relation_details(kind: RelationKind, target: Uuid) -> serde_json::Value {
    json!({ "kind": kind, "targetId": target })
}

#[async_trait]
impl<L> RelationCommand for RelationRegistryService<L>
where
    L: RelationRepository,
{
    async fn add(
        &self,
        user: &UserId,
        kind: RelationKind,
        target: Uuid,
    ) -> Result<Relation, Error> {
        let edge = RelationEdge::new(kind, user, target);
        if kind.forbids_self_relation() && edge.is_self_relation() {
            return Err(
                Error::self_relation_forbidden(format!("cannot create a {kind} to yourself"))
                    .with_details(relation_details(kind, target)),
            );
        }

        let relation = Relation {
            kind,
            user_id: user.clone(),
            target_id: target,
            created_at: self.clock.utc(),
        };
        self.relations
            .insert(&relation)
            .await
            .map_err(|error| Error::from(error).with_details(relation_details(kind, target)))?;

        info!(%kind, user = %user, %target, "relation added");
        Ok(relation)
    }

    async fn remove(&self, user: &UserId, kind: RelationKind, target: Uuid) -> Result<(), Error> {
        let edge = RelationEdge::new(kind, user, target);
        if !self.relations.delete(&edge).await? {
            return Err(Error::not_found(format!("no {kind} relation to {target}"))
                .with_details(relation_details(kind, target)));
        }
        info!(%kind, user = %user, %target, "relation removed");
        Ok(())
    }
}

#[async_trait]
impl<L> RelationQuery for RelationRegistryService<L>
where
    L: RelationRepository,
{
    async fn list(&self, user: &UserId, kind: RelationKind) -> Result<Vec<Uuid>, Error> {
        Ok(self.relations.list_targets(kind, user).await?)
    }

    async fn contains(
        &self,
        user: &UserId,
        kind: RelationKind,
        target: Uuid,
    ) -> Result<bool, Error> {
        Ok(self
            .relations
            .contains(&RelationEdge::new(kind, user, target))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        FixtureRelationRepository, MockRelationRepository, RelationRepositoryError,
    };
    use crate::test_support::clock::{SteppingClock, fixture_timestamp};
    use rstest::rstest;

    fn service<L>(repo: L) -> RelationRegistryService<L> {
        RelationRegistryService::new(
            Arc::new(repo),
            Arc::new(SteppingClock::frozen(fixture_timestamp())),
        )
    }

    #[tokio::test]
    async fn self_subscription_is_rejected_before_storage() {
        let mut repo = MockRelationRepository::new();
        repo.expect_insert().never();
        let user = UserId::random();

        let error = service(repo)
            .add(&user, RelationKind::Subscription, *user.as_uuid())
            .await
            .expect_err("self subscription");

        assert_eq!(error.code(), ErrorCode::SelfRelationForbidden);
    }

    #[rstest]
    #[case(RelationKind::Favorite)]
    #[case(RelationKind::Cart)]
    #[tokio::test]
    async fn recipe_relations_skip_the_self_check(#[case] kind: RelationKind) {
        let user = UserId::random();
        let relation = service(FixtureRelationRepository)
            .add(&user, kind, *user.as_uuid())
            .await
            .expect("no self policy for recipe targets");
        assert_eq!(relation.kind, kind);
    }

    #[tokio::test]
    async fn add_stamps_relation_with_clock() {
        let mut repo = MockRelationRepository::new();
        repo.expect_insert()
            .times(1)
            .withf(|relation: &Relation| relation.created_at == fixture_timestamp())
            .return_once(|_| Ok(()));
        let target = Uuid::new_v4();

        let relation = service(repo)
            .add(&UserId::random(), RelationKind::Cart, target)
            .await
            .expect("added");

        assert_eq!(relation.target_id, target);
    }

    #[rstest]
    #[case(RelationRepositoryError::duplicate("cart", "x"), ErrorCode::AlreadyExists)]
    #[case(RelationRepositoryError::missing_target("cart", "x"), ErrorCode::NotFound)]
    #[case(RelationRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[tokio::test]
    async fn add_maps_store_failures(
        #[case] failure: RelationRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockRelationRepository::new();
        repo.expect_insert().return_once(move |_| Err(failure));

        let error = service(repo)
            .add(&UserId::random(), RelationKind::Cart, Uuid::new_v4())
            .await
            .expect_err("store failure");

        assert_eq!(error.code(), expected);
        assert_eq!(
            error.details().and_then(|details| details.get("kind")),
            Some(&json!("cart"))
        );
    }

    #[tokio::test]
    async fn remove_missing_edge_is_not_found() {
        let error = service(FixtureRelationRepository)
            .remove(&UserId::random(), RelationKind::Favorite, Uuid::new_v4())
            .await
            .expect_err("nothing stored");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_passes_through_insertion_order() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut repo = MockRelationRepository::new();
        repo.expect_list_targets()
            .withf(|kind, _| *kind == RelationKind::Subscription)
            .return_once(move |_, _| Ok(vec![second, first]));

        let targets = service(repo)
            .list(&UserId::random(), RelationKind::Subscription)
            .await
            .expect("listed");

        assert_eq!(targets, [second, first]);
    }
}
