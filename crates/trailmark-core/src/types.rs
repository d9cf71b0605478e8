//! Blog posts and the entities derived from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A published blog post. Read-only to the enrichment pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// `"lat,lng"` as written by the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<EntityMention>>,
}

impl BlogPost {
    /// Title, excerpt and body joined for scanning.
    pub fn full_text(&self) -> String {
        format!("{} {} {}", self.title, self.excerpt, self.content)
    }

    /// Parse `coordinates` into `(latitude, longitude)`.
    pub fn coordinates_lat_lng(&self) -> Option<(f64, f64)> {
        let raw = self.coordinates.as_deref()?;
        let (lat, lng) = raw.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Some((lat, lng))
        } else {
            None
        }
    }

    /// Gallery images, empty when the post has none.
    pub fn images(&self) -> &[String] {
        self.gallery.as_deref().unwrap_or(&[])
    }

    pub fn modified_or_published(&self) -> &str {
        self.modified_date.as_deref().unwrap_or(&self.date)
    }

    /// Drop duplicate and blank tags, keeping first-seen order. Tags with
    /// the same [`hashtag_key`] count as duplicates.
    pub fn normalize_tags(&mut self) {
        let mut seen = BTreeSet::new();
        self.tags.retain(|t| {
            let key = hashtag_key(t);
            !key.is_empty() && seen.insert(key)
        });
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Normalize a tag to its index and URL key: lower-case, hyphenated, no
/// leading `#`.
pub fn hashtag_key(tag: &str) -> String {
    tag.trim()
        .trim_start_matches('#')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Category of a recognized entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Person,
    Place,
    Organization,
    Event,
    Thing,
    Activity,
    Cultural,
    Food,
    Transport,
}

impl EntityType {
    pub fn all() -> &'static [EntityType] {
        &[
            Self::Person,
            Self::Place,
            Self::Organization,
            Self::Event,
            Self::Thing,
            Self::Activity,
            Self::Cultural,
            Self::Food,
            Self::Transport,
        ]
    }

    /// The closest schema.org type for `about`/`mentions` markup.
    pub fn schema_type(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Place => "Place",
            Self::Organization => "Organization",
            Self::Event => "Event",
            Self::Food => "Food",
            Self::Cultural => "LandmarksOrHistoricalBuildings",
            Self::Activity | Self::Transport | Self::Thing => "Thing",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Person => "Person",
            Self::Place => "Place",
            Self::Organization => "Organization",
            Self::Event => "Event",
            Self::Thing => "Thing",
            Self::Activity => "Activity",
            Self::Cultural => "Cultural",
            Self::Food => "Food",
            Self::Transport => "Transport",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// A recognized entity within a single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMention {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_graph_id: Option<String>,
}

impl EntityMention {
    pub fn new(entity_type: EntityType, name: impl Into<String>, confidence: f64) -> Self {
        Self {
            entity_type,
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
            context: None,
            category: None,
            sentiment: None,
            relevance: None,
            knowledge_graph_id: None,
        }
    }

    /// Graph key, `"Type:Name"`.
    pub fn key(&self) -> String {
        entity_key(self.entity_type, &self.name)
    }
}

pub fn entity_key(entity_type: EntityType, name: &str) -> String {
    format!("{}:{}", entity_type, name)
}

/// An entity aggregated across the whole corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGraphEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub frequency: u32,
    pub connections: BTreeSet<String>,
    pub confidence: f64,
    pub related_posts: BTreeSet<String>,
}
