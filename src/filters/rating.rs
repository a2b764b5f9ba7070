//! Minimum star rating filter.

use super::Filter;
use crate::amazon::Product;

/// Keeps products rated at least `min_stars`; unrated products pass.
pub struct RatingFilter {
    min_stars: f32,
}

impl RatingFilter {
    /// Creates a filter for `min_stars`, clamped to 0.0 - 5.0.
    pub fn new(min_stars: f32) -> Self {
        Self { min_stars: min_stars.clamp(0.0, 5.0) }
    }
}

impl Filter for RatingFilter {
    fn matches(&self, product: &Product) -> bool {
        product.stars().map_or(true, |stars| stars >= self.min_stars)
    }

    fn description(&self) -> String {
        format!("Rating: >= {:.1} stars", self.min_stars)
    }
}
