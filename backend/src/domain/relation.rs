//! User-to-target relations: favourites, shopping cart entries, and
//! subscriptions.
//!
//! All three share one shape, `(kind, user, target)`, and one uniqueness rule.
//! The per-kind differences are small enough to express as policy methods on
//! [`RelationKind`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RecipeId, UserId};

/// Entity type a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationTarget {
    /// The target is a recipe.
    Recipe,
    /// The target is another user.
    User,
}

/// Kind of user relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Recipe marked as a favourite.
    Favorite,
    /// Recipe placed in the shopping cart.
    Cart,
    /// Subscription to another author.
    Subscription,
}

impl RelationKind {
    /// Every relation kind.
    pub const ALL: [Self; 3] = [Self::Favorite, Self::Cart, Self::Subscription];

    /// Stable storage label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Cart => "cart",
            Self::Subscription => "subscription",
        }
    }

    /// Entity type this relation targets.
    pub const fn target(self) -> RelationTarget {
        match self {
            Self::Favorite | Self::Cart => RelationTarget::Recipe,
            Self::Subscription => RelationTarget::User,
        }
    }

    /// Whether a user may not relate to themselves with this kind.
    pub const fn forbids_self_relation(self) -> bool {
        matches!(self, Self::Subscription)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown relation label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relation kind: {0}")]
pub struct ParseRelationKindError(pub String);

impl FromStr for RelationKind {
    type Err = ParseRelationKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ParseRelationKindError(value.to_owned()))
    }
}

/// Identity of a relation: the uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationEdge {
    /// Relation kind.
    pub kind: RelationKind,
    /// Owning user.
    pub user_id: Uuid,
    /// Target recipe or user.
    pub target_id: Uuid,
}

impl RelationEdge {
    /// Build an edge from a user and raw target.
    pub fn new(kind: RelationKind, user: &UserId, target_id: Uuid) -> Self {
        Self {
            kind,
            user_id: *user.as_uuid(),
            target_id,
        }
    }

    /// Favourite edge for a recipe.
    pub fn favorite(user: &UserId, recipe: RecipeId) -> Self {
        Self::new(RelationKind::Favorite, user, *recipe.as_uuid())
    }

    /// Shopping cart edge for a recipe.
    pub fn cart(user: &UserId, recipe: RecipeId) -> Self {
        Self::new(RelationKind::Cart, user, *recipe.as_uuid())
    }

    /// Subscription edge to an author.
    pub fn subscription(user: &UserId, author: &UserId) -> Self {
        Self::new(RelationKind::Subscription, user, *author.as_uuid())
    }

    /// Whether the edge points back at its own user.
    pub fn is_self_relation(&self) -> bool {
        self.user_id == self.target_id
    }
}

/// Persisted relation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Relation kind.
    pub kind: RelationKind,
    /// Owning user.
    pub user_id: UserId,
    /// Target recipe or user.
    pub target_id: Uuid,
    /// When the relation was recorded.
    pub created_at: DateTime<Utc>,
}

impl Relation {
    /// Uniqueness key for this relation.
    pub fn edge(&self) -> RelationEdge {
        RelationEdge::new(self.kind, &self.user_id, self.target_id)
    }
}
