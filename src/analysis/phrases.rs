//! Bigram frequency over review text.

use crate::amazon::ReviewRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Default number of phrases kept in an analysis.
pub const DEFAULT_TOP_PHRASES: usize = 5;

/// Bigram counts ordered by descending count, ties in first-seen order.
///
/// Serializes as a JSON object whose key order is the ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseCounts(Vec<(String, usize)>);

impl PhraseCounts {
    /// Returns the count for a phrase, if ranked.
    pub fn get(&self, phrase: &str) -> Option<usize> {
        self.0.iter().find(|(p, _)| p == phrase).map(|(_, count)| *count)
    }

    /// Iterates ranked phrases in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(p, count)| (p.as_str(), *count))
    }

    /// Returns the ranked phrase strings in order.
    pub fn phrases(&self) -> Vec<&str> {
        self.0.iter().map(|(p, _)| p.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PhraseCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (phrase, count) in &self.0 {
            map.serialize_entry(phrase, count)?;
        }
        map.end()
    }
}

/// Counts adjacent word pairs across all review texts and keeps the top `k`.
///
/// Texts are lower-cased and joined with single spaces before tokenizing, so a
/// bigram may span the end of one review and the start of the next.
pub fn top_phrases(reviews: &[ReviewRecord], k: usize) -> PhraseCounts {
    let text = reviews.iter().map(|r| r.text.to_lowercase()).collect::<Vec<_>>().join(" ");
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for pair in words.windows(2) {
        let phrase = format!("{} {}", pair[0], pair[1]);
        match index.get(&phrase) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(phrase.clone(), counts.len());
                counts.push((phrase, 1));
            }
        }
    }

    // sort_by is stable: equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);

    PhraseCounts(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(text: &str) -> ReviewRecord {
        ReviewRecord { text: text.to_string(), ..ReviewRecord::default() }
    }

    #[test]
    fn test_repeated_phrases_rank_first() {
        let reviews = vec![review("the cat sat"), review("the cat sat")];
        let phrases = top_phrases(&reviews, 5);

        assert_eq!(phrases.get("the cat"), Some(2));
        assert_eq!(phrases.get("cat sat"), Some(2));
        // "sat the" spans the review boundary and appears once
        assert_eq!(phrases.get("sat the"), Some(1));
        assert_eq!(phrases.phrases(), vec!["the cat", "cat sat", "sat the"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let reviews = vec![review("a b c d e f g")];
        let phrases = top_phrases(&reviews, 3);
        assert_eq!(phrases.phrases(), vec!["a b", "b c", "c d"]);
    }

    #[test]
    fn test_lowercases_and_collapses_whitespace() {
        let reviews = vec![review("Works  GREAT\n"), review("works great")];
        let phrases = top_phrases(&reviews, 5);
        assert_eq!(phrases.get("works great"), Some(2));
        assert_eq!(phrases.get("great works"), Some(1));
    }

    #[test]
    fn test_truncates_to_k() {
        let reviews = vec![review("one two three four five six seven eight")];
        assert_eq!(top_phrases(&reviews, 5).len(), 5);
        assert_eq!(top_phrases(&reviews, 2).len(), 2);
        assert!(top_phrases(&reviews, 0).is_empty());
    }

    #[test]
    fn test_no_bigrams() {
        assert!(top_phrases(&[], 5).is_empty());
        assert!(top_phrases(&[review("single")], 5).is_empty());
        assert!(top_phrases(&[review("")], 5).is_empty());
    }

    #[test]
    fn test_serializes_in_rank_order() {
        let reviews = vec![review("x y z"), review("y z")];
        let json = serde_json::to_string(&top_phrases(&reviews, 5)).unwrap();
        assert_eq!(json, r#"{"y z":2,"x y":1,"z y":1}"#);
    }
}
