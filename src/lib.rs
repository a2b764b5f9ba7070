//! amz-shopper - AI shopping assistant for Amazon
//!
//! Searches Amazon with TLS fingerprint emulation, collects product details
//! and customer reviews, aggregates review statistics and asks an
//! OpenAI-compatible model for a purchase recommendation.

pub mod amazon;
pub mod analysis;
pub mod commands;
pub mod config;
pub mod filters;
pub mod format;
pub mod recommend;

pub use amazon::models::{Price, Product, ProductDetails, Rating, ReviewRecord};
pub use amazon::regions::Region;
pub use analysis::{aggregate, AnalysisError, AnalyzedProduct, ReviewAnalysis};
pub use config::Config;
