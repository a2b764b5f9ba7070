//! Review aggregation: rating distribution, phrase frequency and sentiment tally.

pub mod phrases;
pub mod sentiment;

use crate::amazon::{Product, ProductDetails, ReviewRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

pub use phrases::{top_phrases, PhraseCounts, DEFAULT_TOP_PHRASES};
pub use sentiment::{classify_sentiment, Sentiment, SentimentSummary};

/// Input records that break the review data contract.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("review #{index} has invalid rating {rating} (expected 0.0 - 5.0)")]
    InvalidRating { index: usize, rating: f32 },
}

/// Summary statistics over a batch of reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewAnalysis {
    pub total_reviews: usize,
    pub average_rating: f64,
    pub verified_purchases: usize,
    /// Count per rating, keyed by the rating with one decimal ("4.0", "4.5")
    pub rating_distribution: BTreeMap<String, usize>,
    pub common_phrases: PhraseCounts,
    pub sentiment_summary: SentimentSummary,
}

impl ReviewAnalysis {
    /// Share of reviews from verified purchases (0.0 - 1.0).
    pub fn verified_ratio(&self) -> f64 {
        if self.total_reviews == 0 {
            return 0.0;
        }
        self.verified_purchases as f64 / self.total_reviews as f64
    }
}

/// A search listing joined with its detail page and review statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedProduct {
    pub basic_info: Product,
    pub detailed_info: ProductDetails,
    /// `None` when no reviews could be collected
    pub review_analysis: Option<ReviewAnalysis>,
}

/// Aggregates a batch of reviews in one pass.
///
/// Returns `Ok(None)` for an empty batch. A rating outside 0.0 - 5.0 (or NaN)
/// is reported as an error rather than skipped.
pub fn aggregate(reviews: &[ReviewRecord]) -> Result<Option<ReviewAnalysis>, AnalysisError> {
    if reviews.is_empty() {
        return Ok(None);
    }

    let mut rating_sum = 0.0_f64;
    let mut verified_purchases = 0;
    let mut rating_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut sentiment_summary = SentimentSummary::default();

    for (index, review) in reviews.iter().enumerate() {
        if !(0.0..=5.0).contains(&review.rating) {
            return Err(AnalysisError::InvalidRating { index, rating: review.rating });
        }

        rating_sum += f64::from(review.rating);
        *rating_distribution.entry(format!("{:.1}", review.rating)).or_insert(0) += 1;

        if review.verified {
            verified_purchases += 1;
        }

        sentiment_summary.record(classify_sentiment(&review.text));
    }

    let analysis = ReviewAnalysis {
        total_reviews: reviews.len(),
        average_rating: rating_sum / reviews.len() as f64,
        verified_purchases,
        rating_distribution,
        common_phrases: top_phrases(reviews, DEFAULT_TOP_PHRASES),
        sentiment_summary,
    };

    debug!(
        "Analyzed {} reviews (avg {:.2}, {} verified)",
        analysis.total_reviews, analysis.average_rating, analysis.verified_purchases
    );

    Ok(Some(analysis))
}
