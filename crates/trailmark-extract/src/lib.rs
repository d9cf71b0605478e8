//! Trailmark Extract: dictionary-driven entity extraction, sentiment scoring,
//! keyword heuristics, per-slug caching and batch processing.

pub mod batch;
pub mod cache;
pub mod extract;

pub use batch::{extract_batch, BATCH_SIZE};
pub use cache::BoundedCache;
pub use extract::keywords;
pub use extract::sentiment::{KeywordSentiment, SentimentScorer};
pub use extract::text;
pub use extract::EntityExtractor;
