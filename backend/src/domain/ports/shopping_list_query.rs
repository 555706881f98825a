//! Driving port for the consolidated shopping list.

use async_trait::async_trait;

use crate::domain::{Error, ShoppingList, UserId};

/// Shopping list use case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Aggregate every recipe in `user`'s cart. An empty cart yields an empty
    /// list.
    async fn shopping_list(&self, user: &UserId) -> Result<ShoppingList, Error>;
}
