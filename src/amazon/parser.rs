//! HTML extraction for search results, product pages and review pages.
//!
//! Extraction is best-effort: missing optional fields become `None`, empty
//! strings or `0.0` instead of errors. Only CAPTCHA/error pages and a missing
//! product title fail a whole page.

use crate::amazon::models::{
    Price, PriceRange, Product, ProductDetails, Rating, ReviewPage, ReviewRecord, SearchResults,
};
use crate::amazon::regions::Region;
use crate::amazon::selectors::{errors, nav, product, reviews, search};
use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace, warn};

/// Parser for Amazon HTML pages.
pub struct Parser {
    region: Region,
}

impl Parser {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Parses search results HTML into structured data.
    pub fn parse_search(&self, html: &str, query: &str, page: u32) -> Result<SearchResults> {
        let document = Html::parse_document(html);
        self.check_for_errors(&document)?;

        let mut results = SearchResults::new(query, self.region.to_string());
        results.page = page;
        results.total_results = self.parse_total_results(&document);

        for element in document.select(&search::RESULT) {
            match self.parse_product_card(element) {
                Some(product) => {
                    trace!("Parsed product: {} - {}", product.asin, product.title);
                    results.products.push(product);
                }
                None => trace!("Skipping result card without ASIN"),
            }
        }

        results.has_more = document.select(&search::NEXT_PAGE).next().is_some();

        debug!(
            "Parsed {} products from page {} (has_more: {})",
            results.products.len(),
            page,
            results.has_more
        );

        Ok(results)
    }

    /// Parses a product detail page.
    pub fn parse_product_details(&self, html: &str, asin: &str) -> Result<ProductDetails> {
        let document = Html::parse_document(html);
        self.check_for_errors(&document)?;

        let title = document
            .select(&product::TITLE)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .context("Could not find product title")?;

        let price = self.parse_price_in(
            document.root_element(),
            &product::PRICE,
            &product::PRICE_WHOLE,
            &product::PRICE_ORIGINAL,
        );

        let rating = self.parse_rating_in(
            document.root_element(),
            &product::RATING,
            &product::REVIEW_COUNT,
        );

        let features: Vec<String> = document
            .select(&product::FEATURES)
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect();

        let availability =
            document.select(&product::AVAILABILITY).next().map(text_of).filter(|t| !t.is_empty());

        let brand = document.select(&product::BRAND).next().map(|e| {
            text_of(e)
                .trim_start_matches("Brand:")
                .trim_start_matches("Visit the")
                .trim_end_matches("Store")
                .trim()
                .to_string()
        });

        debug!("Parsed details for {} ({} features)", asin, features.len());

        Ok(ProductDetails {
            asin: asin.to_string(),
            title,
            price,
            rating,
            features,
            availability,
            brand,
        })
    }

    /// Parses one page of customer reviews.
    pub fn parse_reviews(&self, html: &str) -> Result<ReviewPage> {
        let document = Html::parse_document(html);
        self.check_for_errors(&document)?;

        let reviews: Vec<ReviewRecord> =
            document.select(&reviews::REVIEW).map(|e| self.parse_review(e)).collect();

        let has_next = document.select(&reviews::NEXT_PAGE).next().is_some();

        debug!("Parsed {} reviews (has_next: {})", reviews.len(), has_next);

        Ok(ReviewPage { reviews, has_next })
    }

    /// Returns true if the page's nav greeting belongs to a signed-in account.
    pub fn is_signed_in(&self, html: &str) -> bool {
        let document = Html::parse_document(html);

        match document.select(&nav::ACCOUNT_GREETING).next().map(text_of) {
            Some(greeting) => {
                debug!("Account greeting: {}", greeting);
                !greeting.to_lowercase().contains(self.region.signed_out_marker())
            }
            None => false,
        }
    }

    /// Checks for CAPTCHA, error pages, or rate limiting.
    fn check_for_errors(&self, document: &Html) -> Result<()> {
        if document.select(&errors::CAPTCHA).next().is_some() {
            anyhow::bail!(
                "CAPTCHA detected. Amazon is blocking requests. \
                Try using a proxy, importing browser cookies, or waiting before retrying."
            );
        }

        if document.select(&errors::DOG_PAGE).next().is_some() {
            anyhow::bail!(
                "Amazon error page detected (503). \
                The service may be temporarily unavailable."
            );
        }

        Ok(())
    }

    /// Parses a single product card; `None` for cards without an ASIN.
    fn parse_product_card(&self, element: ElementRef) -> Option<Product> {
        let asin = match element.value().attr(search::ASIN_ATTR) {
            Some(asin) if !asin.is_empty() => asin.to_string(),
            _ => return None,
        };

        let title = element
            .select(&search::TITLE)
            .next()
            .map(text_of)
            .unwrap_or_else(|| "Unknown".to_string());

        let url = element
            .select(&search::TITLE_LINK)
            .next()
            .and_then(|e| e.value().attr("href"))
            .map(|href| {
                if href.starts_with("http") {
                    href.to_string()
                } else {
                    format!("{}{}", self.region.base_url(), href)
                }
            })
            .unwrap_or_else(|| format!("{}/dp/{}", self.region.base_url(), asin));

        let image_url = element
            .select(&search::IMAGE)
            .next()
            .and_then(|e| e.value().attr("src").map(String::from));

        let mut price = self.parse_price_in(
            element,
            &search::PRICE_CURRENT,
            &search::PRICE_WHOLE,
            &search::PRICE_ORIGINAL,
        );
        if let Some(price) = price.as_mut() {
            price.range = self.detect_price_range(element, price.current);
        }

        let rating = self.parse_rating_in(element, &search::RATING_STARS, &search::RATING_COUNT);

        let is_sponsored = element.select(&search::SPONSORED).next().is_some()
            || text_of(element).to_lowercase().contains("sponsored");
        let is_prime = element.select(&search::PRIME_BADGE).next().is_some();
        let is_amazon_choice = element.select(&search::AMAZON_CHOICE).next().is_some()
            || text_of(element).contains("Amazon's Choice");

        let brand = element
            .select(&search::BRAND)
            .next()
            .map(|e| text_of(e).trim_start_matches("by ").to_string());

        // Cards only show a price for purchasable items
        let in_stock = price.is_some();

        Some(Product {
            asin,
            title,
            url,
            image_url,
            price,
            rating,
            is_sponsored,
            is_prime,
            is_amazon_choice,
            in_stock,
            brand,
        })
    }

    /// Parses a review block, defaulting any field that cannot be read.
    fn parse_review(&self, element: ElementRef) -> ReviewRecord {
        let rating = element
            .select(&reviews::STAR_RATING)
            .next()
            .and_then(|e| self.parse_stars(&text_of(e)))
            .filter(|stars| (0.0..=5.0).contains(stars))
            .unwrap_or_else(|| {
                warn!("Review without readable star rating, using 0.0");
                0.0
            });

        let title = element
            .select(&reviews::TITLE_TEXT)
            .next()
            .or_else(|| element.select(&reviews::TITLE).next())
            .map(text_of)
            .unwrap_or_default();

        let text = element.select(&reviews::BODY).next().map(text_of).unwrap_or_default();
        let date = element.select(&reviews::DATE).next().map(text_of).unwrap_or_default();

        let verified = element
            .select(&reviews::VERIFIED_BADGE)
            .next()
            .is_some_and(|e| text_of(e).contains(self.region.verified_purchase_label()));

        ReviewRecord { rating, title, text, date, verified }
    }

    /// Reads current and original price below `scope`.
    fn parse_price_in(
        &self,
        scope: ElementRef,
        current: &Selector,
        whole: &Selector,
        original: &Selector,
    ) -> Option<Price> {
        let current_text = scope
            .select(current)
            .next()
            .or_else(|| scope.select(whole).next())
            .map(text_of)?;

        let lowered = current_text.to_lowercase();
        if lowered.contains("cart") || lowered.contains("see price") {
            return Some(Price::hidden(self.region.currency()));
        }

        let current = self.parse_price_value(&current_text)?;

        let original = scope
            .select(original)
            .next()
            .and_then(|e| self.parse_price_value(&text_of(e)))
            .filter(|orig| *orig > current);

        Some(Price {
            current,
            original,
            currency: self.region.currency().to_string(),
            range: None,
            is_hidden: false,
        })
    }

    /// Reads star rating and review count below `scope`.
    fn parse_rating_in(
        &self,
        scope: ElementRef,
        stars: &Selector,
        count: &Selector,
    ) -> Option<Rating> {
        let stars = scope.select(stars).next().and_then(|e| self.parse_stars(&text_of(e)))?;

        let review_count =
            scope.select(count).next().map(|e| self.parse_review_count(&text_of(e))).unwrap_or(0);

        Some(Rating::new(stars, review_count))
    }

    /// Parses a price value from text, handling regional formats.
    fn parse_price_value(&self, text: &str) -> Option<f64> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
            .collect();

        // "10-20" ranges use the lower bound
        let first = cleaned.split('-').next().unwrap_or_default();
        self.parse_single_price(first)
    }

    fn parse_single_price(&self, text: &str) -> Option<f64> {
        let cleaned = text.trim().trim_end_matches(['.', ',']);
        if cleaned.is_empty() {
            return None;
        }

        let normalized = if self.region.uses_comma_decimal() {
            // 1.234,56 -> 1234.56
            cleaned.replace('.', "").replace(',', ".")
        } else {
            // 1,234.56 -> 1234.56
            cleaned.replace(',', "")
        };

        normalized.parse().ok()
    }

    fn detect_price_range(&self, element: ElementRef, min: f64) -> Option<PriceRange> {
        element.select(&search::PRICE_RANGE).next()?;

        let max = element
            .select(&search::PRICE_CURRENT)
            .nth(1)
            .and_then(|e| self.parse_price_value(&text_of(e)))?;

        (max > min).then_some(PriceRange { min, max: Some(max) })
    }

    /// Extracts the first number from text like "4.5 out of 5 stars".
    fn parse_stars(&self, text: &str) -> Option<f32> {
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let number: String = text[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();

        number.trim_end_matches(['.', ',']).replace(',', ".").parse().ok()
    }

    /// Extracts review count from text like "1,234 ratings".
    fn parse_review_count(&self, text: &str) -> u32 {
        let cleaned: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        cleaned.parse().unwrap_or(0)
    }

    /// Parses total results count ("1-48 of over 10,000 results").
    fn parse_total_results(&self, document: &Html) -> Option<u32> {
        let text = document.select(&search::TOTAL_RESULTS).next().map(text_of)?;
        let cleaned: String =
            text.split("of").nth(1)?.chars().filter(|c| c.is_ascii_digit()).collect();
        cleaned.parse().ok()
    }
}

/// Collected, trimmed text of an element.
fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
