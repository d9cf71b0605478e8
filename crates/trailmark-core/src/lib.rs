//! Trailmark Core: blog data model, site/server configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AuthorProfile, BusinessProfile, DataPaths, ServerConfig, SiteConfig};
pub use error::{Error, Result};
pub use types::{hashtag_key, BlogPost, EntityMention, EntityType, KnowledgeGraphEntity, Sentiment};
