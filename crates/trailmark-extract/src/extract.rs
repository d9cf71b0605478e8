//! Dictionary-driven entity extraction.
//!
//! Scans a post's lower-cased title, excerpt and body against the pattern
//! dictionary, normalises each match to title case and keeps the first
//! mention of every `(type, name)` pair. Each mention carries a 100-char
//! context window, a sentiment for that window and a relevance score.

pub mod dictionary;
pub mod keywords;
pub mod sentiment;
pub mod text;

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::cache::BoundedCache;
use dictionary::{PatternEntry, DICTIONARY};
use sentiment::{KeywordSentiment, SentimentScorer};
use trailmark_core::{BlogPost, EntityMention, EntityType};

/// Width of the text window kept around each match.
pub const CONTEXT_WINDOW: usize = 100;

/// Entity extractor with a per-slug result cache.
pub struct EntityExtractor {
    dictionary: &'static [PatternEntry],
    scorer: Box<dyn SentimentScorer>,
    cache: BoundedCache<Vec<EntityMention>>,
}

impl EntityExtractor {
    pub fn new(cache_size: usize, cache_ttl: Duration) -> Self {
        Self::with_scorer(Box::new(KeywordSentiment::new()), cache_size, cache_ttl)
    }

    /// Use a custom sentiment scorer instead of the keyword tally.
    pub fn with_scorer(
        scorer: Box<dyn SentimentScorer>,
        cache_size: usize,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            dictionary: DICTIONARY.as_slice(),
            scorer,
            cache: BoundedCache::new(cache_size, cache_ttl),
        }
    }

    /// Entities for a post, served from the cache when present.
    pub fn extract(&self, post: &BlogPost) -> Vec<EntityMention> {
        if let Some(hit) = self.cache.get(&post.slug) {
            return hit;
        }
        let mentions = self.extract_uncached(post);
        debug!("Extracted {} entities from {}", mentions.len(), post.slug);
        self.cache.put(post.slug.clone(), mentions.clone());
        mentions
    }

    /// Run the dictionary scan without touching the cache.
    pub fn extract_uncached(&self, post: &BlogPost) -> Vec<EntityMention> {
        let text = post.full_text().to_lowercase();
        let mut seen: HashSet<(EntityType, String)> = HashSet::new();
        let mut mentions = Vec::new();

        for entry in self.dictionary {
            for m in entry.regex.find_iter(&text) {
                let name = text::title_case(m.as_str());
                if name.is_empty() || !seen.insert((entry.entity_type, name.clone())) {
                    continue;
                }

                let context = text::context_window(&text, m.start(), m.end(), CONTEXT_WINDOW);
                let mut mention = EntityMention::new(entry.entity_type, name, entry.confidence);
                mention.sentiment = Some(self.scorer.score(context));
                mention.relevance = Some(relevance(context));
                mention.context = Some(context.to_string());
                mention.category = Some(entry.category.to_string());
                mention.knowledge_graph_id = Some(mention.key());
                mentions.push(mention);
            }
        }

        mentions
    }

    /// Drop one post's cached entities.
    pub fn invalidate(&self, slug: &str) -> bool {
        self.cache.remove(slug)
    }

    /// Drop every cached extraction. Returns the number of entries removed.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    pub fn cached_posts(&self) -> usize {
        self.cache.len()
    }
}

/// Longer surrounding context means a more substantive mention.
fn relevance(context: &str) -> f64 {
    (text::char_len(context) as f64 / CONTEXT_WINDOW as f64).min(1.0)
}
