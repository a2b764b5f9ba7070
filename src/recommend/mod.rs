//! Purchase recommendations from an OpenAI-compatible chat completion API.

pub mod api;
pub mod client;
pub mod prompt;

use crate::analysis::AnalyzedProduct;
use async_trait::async_trait;

pub use client::OpenAiRecommender;
pub use prompt::{build_prompt, SYSTEM_PROMPT};

/// Produces a free-text recommendation - enables mocking for tests.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Returns the model's recommendation, or `None` if none could be obtained.
    async fn recommend(&self, query: &str, products: &[AnalyzedProduct]) -> Option<String>;
}
