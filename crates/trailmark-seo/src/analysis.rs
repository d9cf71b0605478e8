//! On-page content checks and a 0–100 score for a single post.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use trailmark_core::{BlogPost, EntityMention, EntityType};
use trailmark_extract::keywords::top_terms;
use trailmark_extract::text::char_len;

use crate::titles::{DESCRIPTION_MAX, TITLE_MAX};

pub const WORDS_PER_MINUTE: usize = 200;
const TITLE_MIN: usize = 30;
const DESCRIPTION_MIN: usize = 120;
const THIN_CONTENT: usize = 300;
const SHORT_CONTENT: usize = 600;
/// Primary keyword share above which content reads as stuffed.
const MAX_DENSITY: f64 = 3.0;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+\S").unwrap());
static MD_IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    fn penalty(self) -> u32 {
        match self {
            Severity::Error => 20,
            Severity::Warning => 10,
            Severity::Info => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentIssue {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDensity {
    pub keyword: String,
    pub count: usize,
    /// Percentage of body words.
    pub density: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub slug: String,
    pub word_count: usize,
    pub reading_time_minutes: usize,
    pub heading_count: usize,
    pub image_count: usize,
    pub title_length: usize,
    pub description_length: usize,
    pub keyword_density: Vec<KeywordDensity>,
    pub entity_counts: BTreeMap<EntityType, usize>,
    pub issues: Vec<ContentIssue>,
    pub score: u32,
}

pub fn analyze_post(post: &BlogPost, entities: &[EntityMention]) -> ContentAnalysis {
    let word_count = post.word_count();
    let heading_count = HEADING_RE.find_iter(&post.content).count();
    let image_count = post.images().len() + MD_IMAGE_RE.find_iter(&post.content).count();
    let title_length = char_len(&post.title);
    let description_length = char_len(post.excerpt.trim());

    let body = post.content.to_lowercase();
    let body_words: Vec<&str> = body
        .split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .filter(|w| !w.is_empty())
        .collect();
    let keyword_density: Vec<KeywordDensity> = top_terms(&post.content, 5)
        .into_iter()
        .map(|keyword| {
            let count = body_words.iter().filter(|w| **w == keyword).count();
            let density = if word_count == 0 {
                0.0
            } else {
                (count as f64 / word_count as f64 * 1000.0).round() / 10.0
            };
            KeywordDensity { keyword, count, density }
        })
        .collect();

    let mut entity_counts: BTreeMap<EntityType, usize> = BTreeMap::new();
    for entity in entities {
        *entity_counts.entry(entity.entity_type).or_default() += 1;
    }

    let mut issues = Vec::new();
    let mut flag = |severity, message: String| issues.push(ContentIssue { severity, message });

    if word_count < THIN_CONTENT {
        flag(
            Severity::Error,
            format!("Thin content: {} words (aim for at least {})", word_count, SHORT_CONTENT),
        );
    } else if word_count < SHORT_CONTENT {
        flag(
            Severity::Warning,
            format!("Short content: {} words (aim for at least {})", word_count, SHORT_CONTENT),
        );
    }
    if title_length > TITLE_MAX {
        flag(
            Severity::Warning,
            format!("Title is {} characters; search results cut off after {}", title_length, TITLE_MAX),
        );
    } else if title_length < TITLE_MIN {
        flag(Severity::Info, format!("Title is short ({} characters)", title_length));
    }
    if description_length == 0 {
        flag(Severity::Warning, "Missing excerpt for the meta description".to_string());
    } else if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&description_length) {
        flag(
            Severity::Info,
            format!(
                "Excerpt is {} characters; {}–{} is ideal",
                description_length, DESCRIPTION_MIN, DESCRIPTION_MAX
            ),
        );
    }
    if heading_count == 0 {
        flag(Severity::Warning, "No headings in the body".to_string());
    }
    if image_count == 0 {
        flag(Severity::Warning, "No images".to_string());
    }
    if post.location.as_deref().map_or(true, |l| l.trim().is_empty()) {
        flag(Severity::Info, "No location set; local search signals are lost".to_string());
    }
    if post.tags.is_empty() {
        flag(Severity::Info, "No tags".to_string());
    }
    if entities.is_empty() {
        flag(Severity::Info, "No recognizable entities in the text".to_string());
    }
    if let Some(primary) = keyword_density.first() {
        if primary.density > MAX_DENSITY {
            flag(
                Severity::Warning,
                format!("Keyword '{}' density is {:.1}%", primary.keyword, primary.density),
            );
        }
    }

    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();

    ContentAnalysis {
        slug: post.slug.clone(),
        word_count,
        reading_time_minutes: word_count.div_ceil(WORDS_PER_MINUTE).max(1),
        heading_count,
        image_count,
        title_length,
        description_length,
        keyword_density,
        entity_counts,
        issues,
        score: 100u32.saturating_sub(penalty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_post() -> BlogPost {
        // distinct words keep every keyword density low
        let body: Vec<String> = (0..700).map(|i| format!("stall{}", i)).collect();
        BlogPost {
            slug: "night-market".into(),
            title: "Eating Through the Chiang Mai Night Market".into(),
            excerpt: "A full evening of street food at the Chiang Mai night bazaar, from grilled \
                      skewers to mango sticky rice, with tips for the best stalls."
                .into(),
            content: format!("## Where to start\n\n{}\n\n![stalls](/img/stalls.jpg)", body.join(" ")),
            tags: vec!["Street Food".into()],
            location: Some("Chiang Mai".into()),
            date: "2024-02-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rich_post_scores_high() {
        let entities = vec![EntityMention::new(EntityType::Place, "Chiang Mai", 0.95)];
        let analysis = analyze_post(&rich_post(), &entities);
        assert_eq!(analysis.heading_count, 1);
        assert_eq!(analysis.image_count, 1);
        assert!(analysis.word_count > 600);
        assert_eq!(analysis.reading_time_minutes, analysis.word_count.div_ceil(200));
        assert_eq!(analysis.entity_counts[&EntityType::Place], 1);
        assert_eq!(analysis.score, 100, "{:?}", analysis.issues);
    }

    #[test]
    fn test_empty_post_flags_issues() {
        let post = BlogPost {
            slug: "stub".into(),
            title: "Stub".into(),
            date: "2024-01-01".into(),
            ..Default::default()
        };
        let analysis = analyze_post(&post, &[]);
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.reading_time_minutes, 1);
        assert!(analysis.keyword_density.is_empty());
        assert!(analysis
            .issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.message.starts_with("Thin content")));
        assert!(analysis.score < 50);
    }

    #[test]
    fn test_deterministic() {
        let a = analyze_post(&rich_post(), &[]);
        let b = analyze_post(&rich_post(), &[]);
        assert_eq!(a.score, b.score);
        assert_eq!(a.issues.len(), b.issues.len());
    }
}
