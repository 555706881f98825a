//! Consolidated shopping list built from every recipe in a user's cart.
//!
//! Lines are grouped by `(ingredient name, unit)` using exact string
//! equality. No unit conversion happens: "g" and "kg" stay on separate lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One composition row of one recipe, flattened for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositionLine {
    /// Ingredient name.
    pub name: String,
    /// Measurement unit.
    pub unit: String,
    /// Amount contributed by this recipe.
    pub amount: u32,
}

impl CompositionLine {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            amount,
        }
    }
}

/// Aggregated quantity for one `(name, unit)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// Ingredient name.
    pub name: String,
    /// Measurement unit.
    pub unit: String,
    /// Sum of all contributing amounts.
    pub total_amount: u64,
}

/// Ordered shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList(Vec<ShoppingListItem>);

impl ShoppingList {
    /// Suggested file name for the text export.
    pub const FILE_NAME: &'static str = "shopping_list.txt";

    /// Items sorted by name, then unit.
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.0
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct `(name, unit)` lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render the plain-text export.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{CompositionLine, aggregate_shopping_list};
    ///
    /// let list = aggregate_shopping_list([CompositionLine::new("Salt", "tsp", 1)]);
    /// assert_eq!(list.render_text(), "Shopping List:\n\nSalt (tsp) — 1\n");
    /// ```
    pub fn render_text(&self) -> String {
        self.0.iter().fold(
            String::from("Shopping List:\n\n"),
            |mut out, item| {
                out.push_str(&format!(
                    "{} ({}) — {}\n",
                    item.name, item.unit, item.total_amount
                ));
                out
            },
        )
    }
}

impl IntoIterator for ShoppingList {
    type Item = ShoppingListItem;
    type IntoIter = std::vec::IntoIter<ShoppingListItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Group composition lines by `(name, unit)` and sum their amounts.
///
/// Output is sorted byte-wise by name, then unit, so repeated calls over the
/// same input render identically.
///
/// # Examples
/// ```
/// use foodgram::domain::{CompositionLine, aggregate_shopping_list};
///
/// let list = aggregate_shopping_list([
///     CompositionLine::new("Flour", "g", 200),
///     CompositionLine::new("Flour", "g", 300),
///     CompositionLine::new("Salt", "tsp", 1),
/// ]);
///
/// let totals: Vec<_> = list
///     .items()
///     .iter()
///     .map(|item| (item.name.as_str(), item.unit.as_str(), item.total_amount))
///     .collect();
/// assert_eq!(totals, [("Flour", "g", 500), ("Salt", "tsp", 1)]);
/// ```
pub fn aggregate_shopping_list(lines: impl IntoIterator<Item = CompositionLine>) -> ShoppingList {
    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
    for line in lines {
        *totals.entry((line.name, line.unit)).or_default() += u64::from(line.amount);
    }

    ShoppingList(
        totals
            .into_iter()
            .map(|((name, unit), total_amount)| ShoppingListItem {
                name,
                unit,
                total_amount,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_input_yields_empty_list() {
        let list = aggregate_shopping_list(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render_text(), "Shopping List:\n\n");
    }

    #[rstest]
    fn units_are_never_merged() {
        let list = aggregate_shopping_list([
            CompositionLine::new("Sugar", "kg", 1),
            CompositionLine::new("Sugar", "g", 500),
            CompositionLine::new("Sugar", "g", 250),
        ]);

        let totals: Vec<_> = list
            .items()
            .iter()
            .map(|item| (item.unit.as_str(), item.total_amount))
            .collect();
        assert_eq!(totals, [("g", 750), ("kg", 1)]);
    }

    #[rstest]
    fn names_compare_byte_wise() {
        let list = aggregate_shopping_list([
            CompositionLine::new("apple", "pcs", 1),
            CompositionLine::new("Apple", "pcs", 2),
        ]);

        let names: Vec<_> = list.items().iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Apple", "apple"]);
    }

    #[rstest]
    fn totals_do_not_overflow_u32() {
        let lines = (0..200_000).map(|_| CompositionLine::new("Water", "ml", 32_000));
        let list = aggregate_shopping_list(lines);
        assert_eq!(list.items()[0].total_amount, 6_400_000_000);
    }

    #[rstest]
    fn text_export_writes_one_line_per_item() {
        let list = aggregate_shopping_list([
            CompositionLine::new("Salt", "tsp", 1),
            CompositionLine::new("Flour", "g", 200),
            CompositionLine::new("Flour", "g", 300),
        ]);

        assert_eq!(
            list.render_text(),
            "Shopping List:\n\nFlour (g) — 500\nSalt (tsp) — 1\n"
        );
    }

    #[rstest]
    fn serialises_as_item_array() {
        let list = aggregate_shopping_list([CompositionLine::new("Salt", "tsp", 1)]);
        let value = serde_json::to_value(&list).expect("serialise list");
        assert_eq!(
            value,
            serde_json::json!([{ "name": "Salt", "unit": "tsp", "totalAmount": 1 }])
        );
    }
}
