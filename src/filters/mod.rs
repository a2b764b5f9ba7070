//! Composable product filters applied to search listings before any
//! product or review pages are fetched.

pub mod budget;
pub mod rating;

use crate::amazon::Product;

pub use budget::BudgetFilter;
pub use rating::RatingFilter;

/// Trait for filtering products.
pub trait Filter: Send + Sync {
    /// Returns true if the product passes the filter.
    fn matches(&self, product: &Product) -> bool;

    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// True when every filter accepts the product.
    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Keeps matching products, preserving their order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Human-readable description of each filter, in chain order.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

/// Builder for constructing a FilterChain from configuration.
#[derive(Default)]
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a budget filter. `None` or a non-positive budget means no limit.
    pub fn budget(mut self, max: Option<f64>) -> Self {
        if let Some(max) = max.filter(|m| *m > 0.0) {
            self.chain.add(BudgetFilter::new(max));
        }
        self
    }

    /// Adds a minimum star rating filter.
    pub fn min_rating(mut self, min: Option<f32>) -> Self {
        if let Some(min) = min {
            self.chain.add(RatingFilter::new(min));
        }
        self
    }

    /// Excludes sponsored listings when enabled.
    pub fn no_sponsored(mut self, enabled: bool) -> Self {
        if enabled {
            self.chain.add(SponsoredFilter);
        }
        self
    }

    /// Finishes the chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

/// Filter that excludes sponsored products.
pub struct SponsoredFilter;

impl Filter for SponsoredFilter {
    fn matches(&self, product: &Product) -> bool {
        !product.is_sponsored
    }

    fn description(&self) -> String {
        "Exclude sponsored".to_string()
    }
}
