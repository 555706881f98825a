//! Driving port for browsing and loading the ingredient catalogue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Ingredient, IngredientDraft};

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Entries handed to the store.
    pub submitted: usize,
    /// Entries that were new and got inserted.
    pub inserted: usize,
}

impl ImportSummary {
    /// Entries skipped because the `(name, unit)` pair already existed.
    pub fn skipped(&self) -> usize {
        self.submitted.saturating_sub(self.inserted)
    }
}

/// Ingredient catalogue use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientCatalogue: Send + Sync {
    /// Ingredients whose name starts with `prefix`, ignoring case.
    ///
    /// A blank prefix lists the whole catalogue.
    async fn search(&self, prefix: &str) -> Result<Vec<Ingredient>, Error>;

    /// Add a single ingredient; `ConstraintViolation` when the pair exists.
    async fn create_ingredient(&self, draft: IngredientDraft) -> Result<Ingredient, Error>;

    /// Bulk-load ingredients, skipping pairs that already exist.
    async fn import(&self, drafts: Vec<IngredientDraft>) -> Result<ImportSummary, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, 5, 0)]
    #[case(5, 2, 3)]
    #[case(0, 0, 0)]
    fn summary_reports_skipped(
        #[case] submitted: usize,
        #[case] inserted: usize,
        #[case] skipped: usize,
    ) {
        let summary = ImportSummary {
            submitted,
            inserted,
        };
        assert_eq!(summary.skipped(), skipped);
    }
}
