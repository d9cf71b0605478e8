//! Trailmark Store: read-only blog content, tag/location indexes, knowledge graph.

pub mod content;
pub mod graph;
pub mod index;
pub mod types;

pub use content::ContentStore;
pub use graph::KnowledgeGraph;
pub use index::{IndexReport, PostIndex};
pub use types::*;
