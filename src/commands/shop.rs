//! Shopping pipeline: search, analyze the top products, ask for a recommendation.

use crate::amazon::{AmazonClient, AmazonPages, Parser};
use crate::analysis::{aggregate, AnalyzedProduct};
use crate::commands::{check_signed_in, collect_reviews};
use crate::config::Config;
use crate::filters::FilterChainBuilder;
use crate::format::Formatter;
use crate::recommend::{OpenAiRecommender, Recommender};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Everything a shopping run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ShopReport {
    pub query: String,
    pub budget: Option<f64>,
    pub products: Vec<AnalyzedProduct>,
    pub recommendation: Option<String>,
}

/// Runs the full shopping pipeline for one query.
pub struct ShopCommand {
    config: Config,
}

impl ShopCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the pipeline against Amazon and the configured LLM.
    pub async fn execute(&self, query: &str, budget: Option<f64>) -> Result<String> {
        let client =
            AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;
        let recommender = OpenAiRecommender::new(&self.config.llm)?;

        self.execute_with(&client, &recommender, query, budget).await
    }

    /// Runs the pipeline with provided collaborators and formats the report.
    pub async fn execute_with(
        &self,
        client: &impl AmazonPages,
        recommender: &impl Recommender,
        query: &str,
        budget: Option<f64>,
    ) -> Result<String> {
        let report = self.run(client, recommender, query, budget).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_shop_report(&report))
    }

    pub async fn run(
        &self,
        client: &impl AmazonPages,
        recommender: &impl Recommender,
        query: &str,
        budget: Option<f64>,
    ) -> Result<ShopReport> {
        match check_signed_in(client).await {
            Ok(true) => {}
            Ok(false) => warn!(
                "Continuing without a signed-in session; review pages may be unavailable. \
                 Import browser cookies with `amz-shopper session import <file>`."
            ),
            Err(e) => warn!("Could not check sign-in state: {:#}", e),
        }

        let products = self.analyze(client, query, budget).await?;
        let recommendation = recommender.recommend(query, &products).await;

        Ok(ShopReport { query: query.to_string(), budget, products, recommendation })
    }

    /// Searches and analyzes the top products, in search order.
    pub async fn analyze(
        &self,
        client: &impl AmazonPages,
        query: &str,
        budget: Option<f64>,
    ) -> Result<Vec<AnalyzedProduct>> {
        info!("Searching for: {}", query);

        let parser = Parser::new(client.region());
        let html = client.search(query, 1).await.context("Failed to search for product")?;

        let mut listings = parser.parse_search(&html, query, 1)?.products;
        listings.truncate(self.config.max_products);

        if listings.is_empty() {
            anyhow::bail!("No products found for '{}'", query);
        }

        let filters = FilterChainBuilder::new()
            .budget(budget)
            .min_rating(self.config.min_rating)
            .no_sponsored(self.config.no_sponsored)
            .build();

        let candidates = filters.apply(listings);
        debug!("{} products left after filtering", candidates.len());

        let mut analyzed = Vec::with_capacity(candidates.len());

        for product in candidates {
            let details = match client
                .product(&product.asin)
                .await
                .and_then(|html| parser.parse_product_details(&html, &product.asin))
            {
                Ok(details) => details,
                Err(e) => {
                    warn!("Skipping {}: {:#}", product.asin, e);
                    continue;
                }
            };

            let reviews = collect_reviews(
                client,
                &parser,
                &product.asin,
                self.config.max_reviews,
                self.config.max_review_pages,
            )
            .await;

            let review_analysis = aggregate(&reviews)
                .with_context(|| format!("Invalid review data for {}", product.asin))?;

            analyzed.push(AnalyzedProduct {
                basic_info: product,
                detailed_info: details,
                review_analysis,
            });
        }

        if analyzed.is_empty() {
            anyhow::bail!("No products found matching the budget and filters for '{}'", query);
        }

        info!("Analyzed {} products", analyzed.len());
        Ok(analyzed)
    }
}
