//! Concurrent extraction over many posts.
//!
//! Posts are processed in groups of `BATCH_SIZE`; every post in a group runs
//! on its own blocking task and the whole group is awaited before the next
//! starts. A task that fails is logged and its post gets an empty list.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::extract::EntityExtractor;
use trailmark_core::{BlogPost, EntityMention};

pub const BATCH_SIZE: usize = 10;

/// Extract entities for every post. Keyed by slug.
pub async fn extract_batch(
    extractor: Arc<EntityExtractor>,
    posts: Vec<BlogPost>,
) -> HashMap<String, Vec<EntityMention>> {
    let total = posts.len();
    let mut results = HashMap::with_capacity(total);
    let mut failed = 0usize;

    let mut posts = posts.into_iter().peekable();
    while posts.peek().is_some() {
        let group: Vec<BlogPost> = posts.by_ref().take(BATCH_SIZE).collect();
        let slugs: Vec<String> = group.iter().map(|p| p.slug.clone()).collect();

        let tasks = group.into_iter().map(|post| {
            let extractor = extractor.clone();
            tokio::task::spawn_blocking(move || extractor.extract(&post))
        });

        for (slug, outcome) in slugs.into_iter().zip(join_all(tasks).await) {
            match outcome {
                Ok(mentions) => {
                    results.insert(slug, mentions);
                }
                Err(e) => {
                    warn!("Entity extraction failed for {}: {}", slug, e);
                    failed += 1;
                    results.insert(slug, Vec::new());
                }
            }
        }
    }

    info!(
        "Batch extraction finished: {} posts, {} failed",
        total, failed
    );
    results
}
