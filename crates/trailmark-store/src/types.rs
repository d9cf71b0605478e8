//! Store-level summary types.

use serde::{Deserialize, Serialize};

/// Content store statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_posts: usize,
    pub total_tags: usize,
    pub total_locations: usize,
    pub posts_with_gallery: usize,
    pub index_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub post_count: usize,
}
