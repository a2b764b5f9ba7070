//! Records extracted from Amazon pages: listings, product details and reviews.

use serde::{Deserialize, Serialize};

/// A product card from search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Amazon Standard Identification Number
    pub asin: String,
    pub title: String,
    /// Full product URL
    pub url: String,
    pub image_url: Option<String>,
    pub price: Option<Price>,
    pub rating: Option<Rating>,
    pub is_sponsored: bool,
    pub is_prime: bool,
    /// Whether this has the "Amazon's Choice" badge
    pub is_amazon_choice: bool,
    pub in_stock: bool,
    pub brand: Option<String>,
}

impl Product {
    /// Returns the current price as f64 if available.
    pub fn current_price(&self) -> Option<f64> {
        self.price.as_ref().and_then(|p| if p.is_hidden { None } else { Some(p.current) })
    }

    /// Returns the star rating if available.
    pub fn stars(&self) -> Option<f32> {
        self.rating.as_ref().map(|r| r.stars)
    }
}

/// Details scraped from a product page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    pub asin: String,
    pub title: String,
    pub price: Option<Price>,
    pub rating: Option<Rating>,
    /// "About this item" bullet points
    pub features: Vec<String>,
    /// Raw availability text ("In Stock", "Only 3 left in stock", ...)
    pub availability: Option<String>,
    pub brand: Option<String>,
}

/// Price information including current, original, and range prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    /// Current/sale price
    pub current: f64,
    /// Original price before discount (if on sale)
    pub original: Option<f64>,
    /// Currency code (USD, EUR, etc.)
    pub currency: String,
    pub range: Option<PriceRange>,
    /// True if price is "See price in cart"
    pub is_hidden: bool,
}

impl Price {
    /// Creates a simple price with just current value.
    pub fn simple(current: f64, currency: impl Into<String>) -> Self {
        Self { current, original: None, currency: currency.into(), range: None, is_hidden: false }
    }

    /// Creates a hidden price ("See price in cart").
    pub fn hidden(currency: impl Into<String>) -> Self {
        Self {
            current: 0.0,
            original: None,
            currency: currency.into(),
            range: None,
            is_hidden: true,
        }
    }
}

/// Price range for items with variable pricing ("$X - $Y").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

/// Product rating and review count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    /// Star rating (0.0 - 5.0)
    pub stars: f32,
    pub review_count: u32,
}

impl Rating {
    pub fn new(stars: f32, review_count: u32) -> Self {
        Self { stars: stars.clamp(0.0, 5.0), review_count }
    }
}

/// One customer review.
///
/// The extractor fills missing fields with defaults (rating 0.0, empty
/// strings, not verified) instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Star rating (0.0 - 5.0)
    pub rating: f32,
    pub title: String,
    pub text: String,
    /// Date line as shown on the page
    pub date: String,
    /// Whether the review carries the "Verified Purchase" badge
    pub verified: bool,
}

/// Reviews parsed from a single review page.
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewRecord>,
    /// Whether a "Next page" link exists
    pub has_next: bool,
}

/// Search results container with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub region: String,
    /// Total results found (if available from page)
    pub total_results: Option<u32>,
    pub products: Vec<Product>,
    pub page: u32,
    pub has_more: bool,
}

impl SearchResults {
    pub fn new(query: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            region: region.into(),
            total_results: None,
            products: Vec::new(),
            page: 1,
            has_more: false,
        }
    }

    pub fn count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_product() -> Product {
        Product {
            asin: "TEST123".to_string(),
            title: "Test Product".to_string(),
            url: "https://amazon.com/dp/TEST123".to_string(),
            image_url: None,
            price: Some(Price::simple(20.0, "USD")),
            rating: Some(Rating::new(4.5, 100)),
            is_sponsored: false,
            is_prime: true,
            is_amazon_choice: false,
            in_stock: true,
            brand: Some("TestBrand".to_string()),
        }
    }

    #[test]
    fn test_product_current_price() {
        let product = make_test_product();
        assert_eq!(product.current_price(), Some(20.0));

        let mut product = make_test_product();
        product.price = None;
        assert!(product.current_price().is_none());

        // Hidden prices count as unknown
        let mut product = make_test_product();
        product.price = Some(Price::hidden("USD"));
        assert!(product.current_price().is_none());
    }

    #[test]
    fn test_product_stars() {
        assert_eq!(make_test_product().stars(), Some(4.5));
    }

    #[test]
    fn test_rating_clamping() {
        assert_eq!(Rating::new(6.0, 10).stars, 5.0);
        assert_eq!(Rating::new(-1.0, 10).stars, 0.0);
    }

    #[test]
    fn test_review_record_defaults() {
        let review = ReviewRecord::default();
        assert_eq!(review.rating, 0.0);
        assert!(review.title.is_empty());
        assert!(review.text.is_empty());
        assert!(review.date.is_empty());
        assert!(!review.verified);
    }

    #[test]
    fn test_search_results() {
        let mut results = SearchResults::new("test query", "us");
        assert!(results.is_empty());

        results.products.push(make_test_product());
        assert_eq!(results.count(), 1);
    }

    #[test]
    fn test_product_details_serde() {
        let details = ProductDetails {
            asin: "B08N5WRWNW".to_string(),
            title: "Mouse".to_string(),
            features: vec!["Wireless".to_string()],
            availability: Some("In Stock".to_string()),
            ..ProductDetails::default()
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["features"][0], "Wireless");
        assert_eq!(json["availability"], "In Stock");
        assert!(json["price"].is_null());
    }
}
