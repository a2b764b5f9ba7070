//! amz-shopper - AI shopping assistant for Amazon

use amz_shopper::amazon::regions::Region;
use amz_shopper::amazon::session::default_cookies_path;
use amz_shopper::commands::{ReviewsCommand, SearchCommand, SessionCommand, ShopCommand};
use amz_shopper::config::{Config, OutputFormat};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Input;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-shopper",
    version,
    about = "AI shopping assistant for Amazon",
    long_about = "Searches Amazon, analyzes customer reviews of the top results and asks an LLM which product to buy."
)]
struct Cli {
    /// Amazon region
    #[arg(short, long, global = true, env = "AMZ_REGION")]
    region: Option<Region>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AMZ_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "AMZ_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Cookie file for the Amazon session
    #[arg(long, global = true, env = "AMZ_COOKIES")]
    cookies: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find, analyze and get a recommendation for a product
    Shop {
        /// What to buy (prompted when omitted)
        query: Option<String>,

        /// Maximum price, 0 for no limit (prompted when omitted)
        #[arg(short, long)]
        budget: Option<f64>,

        /// Number of top search results to analyze
        #[arg(long)]
        max_products: Option<usize>,

        /// Reviews collected per product
        #[arg(long)]
        max_reviews: Option<usize>,
    },

    /// Search for products
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        max: usize,

        /// Maximum price
        #[arg(short, long)]
        budget: Option<f64>,

        /// Minimum rating filter (1.0-5.0)
        #[arg(long)]
        min_rating: Option<f32>,

        /// Exclude sponsored products
        #[arg(long)]
        no_sponsored: bool,
    },

    /// Analyze customer reviews of a product
    #[command(alias = "r")]
    Reviews {
        /// Product ASIN
        asin: String,

        /// Reviews to collect
        #[arg(long)]
        max_reviews: Option<usize>,

        /// Review pages to read at most
        #[arg(long)]
        pages: Option<u32>,
    },

    /// Manage the signed-in Amazon session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// List supported regions
    Regions,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Check whether the stored cookies belong to a signed-in account
    Check,

    /// Import cookies exported from a browser (JSON array)
    Import {
        /// Exported cookie file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment files feed both clap `env` args and Config::with_env
    dotenvy::dotenv().ok();
    dotenvy::from_path("config/config.env").ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    config.cookies_path = cli.cookies.or(config.cookies_path).or_else(default_cookies_path);

    match cli.command {
        Commands::Shop { query, budget, max_products, max_reviews } => {
            if let Some(max) = max_products {
                config.max_products = max;
            }
            if let Some(max) = max_reviews {
                config.max_reviews = max;
            }

            let query = match query {
                Some(query) => query,
                None => Input::new()
                    .with_prompt("What would you like to buy?")
                    .interact_text()
                    .context("Failed to read query")?,
            };

            let budget = match budget.or(config.budget) {
                Some(budget) => budget,
                None => Input::<f64>::new()
                    .with_prompt("What's your budget? (Enter 0 for no budget)")
                    .default(0.0)
                    .interact_text()
                    .context("Failed to read budget")?,
            };
            let budget = (budget > 0.0).then_some(budget);

            println!("\nSearching for '{}'...", query);

            let cmd = ShopCommand::new(config);
            let output = cmd.execute(&query, budget).await?;
            println!("{}", output);
        }

        Commands::Search { query, max, budget, min_rating, no_sponsored } => {
            if budget.is_some() {
                config.budget = budget;
            }
            if min_rating.is_some() {
                config.min_rating = min_rating;
            }
            config.no_sponsored |= no_sponsored;

            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&query, max).await?;
            println!("{}", output);
        }

        Commands::Reviews { asin, max_reviews, pages } => {
            if let Some(max) = max_reviews {
                config.max_reviews = max;
            }
            if let Some(pages) = pages {
                config.max_review_pages = pages;
            }

            let cmd = ReviewsCommand::new(config);
            let output = cmd.execute(&asin).await?;
            println!("{}", output);
        }

        Commands::Session { action } => {
            let cmd = SessionCommand::new(config);
            let output = match action {
                SessionAction::Check => cmd.check().await?,
                SessionAction::Import { file } => cmd.import(&file)?,
            };
            println!("{}", output);
        }

        Commands::Regions => {
            println!("Supported Amazon regions:\n");
            println!("{:<6} {:<20} {:<10}", "Code", "Domain", "Currency");
            println!("{:-<6} {:-<20} {:-<10}", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<20} {:<10}",
                    region.to_string(),
                    region.domain(),
                    region.currency()
                );
            }
        }
    }

    Ok(())
}
