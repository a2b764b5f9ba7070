//! Review collection and the `reviews` command.

use crate::amazon::{AmazonClient, AmazonPages, Parser, ReviewRecord};
use crate::analysis::aggregate;
use crate::commands::normalize_asin;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Collects up to `cap` reviews for an ASIN, reading at most `max_pages` pages.
///
/// Stops early on an empty page, a page without a next link, or a failed
/// fetch; whatever was gathered before the failure is kept.
pub async fn collect_reviews(
    client: &impl AmazonPages,
    parser: &Parser,
    asin: &str,
    cap: usize,
    max_pages: u32,
) -> Vec<ReviewRecord> {
    let mut collected: Vec<ReviewRecord> = Vec::new();

    for page in 1..=max_pages {
        if collected.len() >= cap {
            break;
        }

        let result = client.reviews(asin, page).await.and_then(|html| parser.parse_reviews(&html));

        let review_page = match result {
            Ok(review_page) => review_page,
            Err(e) => {
                warn!("Stopping review collection for {} at page {}: {:#}", asin, page, e);
                break;
            }
        };

        if review_page.reviews.is_empty() {
            debug!("No reviews on page {}, stopping", page);
            break;
        }

        collected.extend(review_page.reviews);

        if !review_page.has_next {
            break;
        }
    }

    collected.truncate(cap);
    info!("Collected {} reviews for {}", collected.len(), asin);
    collected
}

/// Collects and analyzes the reviews of a single product.
pub struct ReviewsCommand {
    config: Config,
}

impl ReviewsCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, asin: &str) -> Result<String> {
        let client =
            AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client, asin).await
    }

    /// Analyzes reviews with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl AmazonPages,
        asin: &str,
    ) -> Result<String> {
        let asin = normalize_asin(asin)?;
        let parser = Parser::new(client.region());

        let reviews = collect_reviews(
            client,
            &parser,
            &asin,
            self.config.max_reviews,
            self.config.max_review_pages,
        )
        .await;

        let analysis = aggregate(&reviews)?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_review_analysis(&asin, analysis.as_ref()))
    }
}
