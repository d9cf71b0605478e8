//! Sentiment scoring for the text window around an entity mention.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use trailmark_core::Sentiment;

/// Scores the sentiment of a short text window. Implementations must be
/// cheap and thread-safe; the extractor calls this once per mention.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, window: &str) -> Sentiment;
}

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "amazing", "awesome", "beautiful", "best", "breathtaking", "charming", "delicious",
        "enjoy", "enjoyed", "excellent", "fantastic", "favorite", "favourite", "fresh",
        "friendly", "fun", "gorgeous", "great", "incredible", "love", "loved", "lovely",
        "magical", "memorable", "nice", "peaceful", "perfect", "recommend", "relaxing",
        "spectacular", "stunning", "tasty", "wonderful", "worth",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "avoid", "awful", "bad", "boring", "crowded", "dirty", "disappointing",
        "disappointed", "expensive", "hate", "hated", "horrible", "noisy", "overpriced",
        "overrated", "poor", "rude", "scam", "scammed", "terrible", "touristy", "ugly",
        "unsafe", "worst",
    ]
    .into_iter()
    .collect()
});

/// Bag-of-words tally of positive and negative keywords; ties are neutral.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordSentiment;

impl KeywordSentiment {
    pub fn new() -> Self {
        Self
    }

    /// `(positive, negative)` keyword counts in `window`.
    pub fn tally(window: &str) -> (usize, usize) {
        let mut positive = 0;
        let mut negative = 0;
        for word in window
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            if POSITIVE_WORDS.contains(word.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(word.as_str()) {
                negative += 1;
            }
        }
        (positive, negative)
    }
}

impl SentimentScorer for KeywordSentiment {
    fn score(&self, window: &str) -> Sentiment {
        let (positive, negative) = Self::tally(window);
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}
