//! Keyword-based sentiment classification.
//!
//! Matching is plain substring containment on the lower-cased text, so a
//! keyword inside a longer word ("goodness", "badly") still counts. Each
//! keyword counts at most once per text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keywords that signal a positive review.
pub const POSITIVE_KEYWORDS: [&str; 6] = ["great", "good", "excellent", "amazing", "love", "perfect"];

/// Keywords that signal a negative review.
pub const NEGATIVE_KEYWORDS: [&str; 6] = ["bad", "poor", "terrible", "horrible", "hate", "worst"];

/// Sentiment bucket for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Classifies review text by counting positive and negative keywords.
pub fn classify_sentiment(text: &str) -> Sentiment {
    let text = text.to_lowercase();

    let positive = POSITIVE_KEYWORDS.iter().filter(|word| text.contains(*word)).count();
    let negative = NEGATIVE_KEYWORDS.iter().filter(|word| text.contains(*word)).count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Tally of sentiment buckets across a batch of reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentSummary {
    /// Increments the bucket for the given sentiment.
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    /// Total number of classified reviews.
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}
