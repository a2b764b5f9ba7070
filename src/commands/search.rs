//! Search command implementation.

use crate::amazon::{AmazonClient, AmazonPages, Parser, Product};
use crate::config::Config;
use crate::filters::FilterChainBuilder;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Upper bound on result pages fetched for one search.
const MAX_SEARCH_PAGES: u32 = 5;

/// Lists search results without fetching product or review pages.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, query: &str, limit: usize) -> Result<String> {
        let client =
            AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client, query, limit).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl AmazonPages,
        query: &str,
        limit: usize,
    ) -> Result<String> {
        info!("Searching for: {}", query);

        let parser = Parser::new(client.region());

        let filters = FilterChainBuilder::new()
            .budget(self.config.budget)
            .min_rating(self.config.min_rating)
            .no_sponsored(self.config.no_sponsored)
            .build();

        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }

        let mut found: Vec<Product> = Vec::new();
        let mut page = 1;

        while found.len() < limit && page <= MAX_SEARCH_PAGES {
            let html = client.search(query, page).await?;
            let results = parser.parse_search(&html, query, page)?;

            if results.is_empty() {
                debug!("No results on page {}, stopping", page);
                break;
            }

            let filtered = filters.apply(results.products);
            debug!("Page {} kept {} products after filtering", page, filtered.len());
            found.extend(filtered);

            if !results.has_more {
                break;
            }

            page += 1;
        }

        found.truncate(limit);

        info!("Found {} products matching criteria", found.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(&found))
    }
}
