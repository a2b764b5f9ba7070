//! CLI command implementations.

pub mod reviews;
pub mod search;
pub mod session;
pub mod shop;

pub use reviews::{collect_reviews, ReviewsCommand};
pub use search::SearchCommand;
pub use session::{check_signed_in, SessionCommand};
pub use shop::{ShopCommand, ShopReport};

use anyhow::Result;

/// Normalizes an ASIN (10 alphanumeric characters) to upper case.
pub fn normalize_asin(asin: &str) -> Result<String> {
    let asin = asin.trim().to_uppercase();
    if asin.len() != 10 || !asin.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!(
            "Invalid ASIN format: '{}'. ASIN should be 10 alphanumeric characters.",
            asin
        );
    }
    Ok(asin)
}
