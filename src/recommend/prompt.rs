//! Recommendation prompt construction.

use crate::analysis::AnalyzedProduct;
use anyhow::{Context, Result};

pub const SYSTEM_PROMPT: &str = "You are a helpful AI shopping assistant.";

/// Builds the user prompt with the analyzed products embedded as pretty JSON.
pub fn build_prompt(query: &str, products: &[AnalyzedProduct]) -> Result<String> {
    let data =
        serde_json::to_string_pretty(products).context("Failed to serialize product data")?;

    Ok(format!(
        "I'm looking to buy {query}. Based on the following product data, please recommend the best option:

{data}

Please consider:
1. Price-to-quality ratio
2. Review sentiment and verified purchase ratio
3. Average rating and number of reviews
4. Key features and their relevance

Provide your recommendation in this format:
1. Recommended Product: [product name]
2. Reasoning: [detailed explanation]
3. Key Pros: [list of main advantages]
4. Key Cons: [list of main disadvantages]
5. Price: [price]
"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::models::{Price, ProductDetails, Rating};
    use crate::amazon::Product;

    fn analyzed(asin: &str) -> AnalyzedProduct {
        AnalyzedProduct {
            basic_info: Product {
                asin: asin.to_string(),
                title: "Wireless Mouse".to_string(),
                url: format!("https://www.amazon.com/dp/{}", asin),
                image_url: None,
                price: Some(Price::simple(24.99, "USD")),
                rating: Some(Rating::new(4.6, 812)),
                is_sponsored: false,
                is_prime: true,
                is_amazon_choice: false,
                in_stock: true,
                brand: None,
            },
            detailed_info: ProductDetails {
                asin: asin.to_string(),
                title: "Wireless Mouse".to_string(),
                features: vec!["2.4GHz receiver".to_string()],
                ..ProductDetails::default()
            },
            review_analysis: None,
        }
    }

    #[test]
    fn test_prompt_contains_query_and_data() {
        let prompt = build_prompt("a wireless mouse", &[analyzed("B0TEST0001")]).unwrap();

        assert!(prompt.starts_with("I'm looking to buy a wireless mouse."));
        assert!(prompt.contains("\"asin\": \"B0TEST0001\""));
        assert!(prompt.contains("\"review_analysis\": null"));
        assert!(prompt.contains("2.4GHz receiver"));
        assert!(prompt.contains("1. Price-to-quality ratio"));
        assert!(prompt.contains("5. Price: [price]"));
    }

    #[test]
    fn test_prompt_with_no_products() {
        let prompt = build_prompt("socks", &[]).unwrap();
        assert!(prompt.contains("[]"));
    }
}
