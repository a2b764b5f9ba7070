//! Budget (upper price bound) filter.

use super::Filter;
use crate::amazon::Product;

/// Keeps products priced at or below the budget.
///
/// Products without a readable price (missing or "see price in cart") are
/// excluded, since they cannot be shown to fit the budget.
pub struct BudgetFilter {
    max: f64,
}

impl BudgetFilter {
    /// Creates a budget filter with an inclusive upper bound.
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl Filter for BudgetFilter {
    fn matches(&self, product: &Product) -> bool {
        product.current_price().is_some_and(|price| price <= self.max)
    }

    fn description(&self) -> String {
        format!("Budget: <= {:.2}", self.max)
    }
}
