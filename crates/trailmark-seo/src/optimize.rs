//! Per-post optimization pass: title, description, keywords and a schema
//! check, summarized with a list of concrete improvements.

use serde::Serialize;
use tracing::debug;

use trailmark_core::{BlogPost, EntityMention, Error, Result, SiteConfig};
use trailmark_extract::keywords::search_keywords;
use trailmark_extract::text::char_len;

use crate::analysis::analyze_post;
use crate::schema::SchemaGenerator;
use crate::titles::{optimize_description, optimize_title, TITLE_MAX};
use crate::validate::validate_schema;

const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub slug: String,
    pub success: bool,
    pub original_title: String,
    pub optimized_title: String,
    pub optimized_description: String,
    pub keywords: Vec<String>,
    pub schema_valid: bool,
    pub schema_warnings: Vec<String>,
    pub score: u32,
    pub improvements: Vec<String>,
}

pub struct PostOptimizer {
    schema: SchemaGenerator,
}

impl PostOptimizer {
    pub fn new(site: SiteConfig) -> Self {
        Self {
            schema: SchemaGenerator::new(site),
        }
    }

    pub fn optimize(&self, post: &BlogPost, entities: &[EntityMention]) -> Result<OptimizationResult> {
        if post.title.trim().is_empty() {
            return Err(Error::Validation(format!("Post '{}' has no title", post.slug)));
        }
        let site = self.schema.site();

        let optimized_title =
            optimize_title(&post.title, post.location.as_deref(), Some(&site.name));
        let optimized_description = optimize_description(&post.excerpt, &post.content);
        let keywords = search_keywords(post, entities, MAX_KEYWORDS);

        let posting = self.schema.blog_posting(post, entities);
        let validation = validate_schema(&posting);
        if !validation.valid {
            return Err(Error::Schema(validation.errors.join("; ")));
        }

        let mut improvements = Vec::new();
        let original_len = char_len(post.title.trim());
        if original_len > TITLE_MAX {
            improvements.push(format!(
                "Shortened title from {} to {} characters",
                original_len,
                char_len(&optimized_title)
            ));
        }
        if let Some(location) = post.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            let had = post.title.to_lowercase().contains(&location.to_lowercase());
            if !had && optimized_title.contains(location) {
                improvements.push(format!("Added location '{}' to title", location));
            }
        }
        if optimized_title.ends_with(&format!("| {}", site.name)) {
            improvements.push("Added site name to title".to_string());
        }
        if optimized_description != post.excerpt.trim() {
            improvements.push(format!(
                "Rewrote meta description ({} characters)",
                char_len(&optimized_description)
            ));
        }
        if !keywords.is_empty() {
            improvements.push(format!("Generated {} search keywords", keywords.len()));
        }
        if !entities.is_empty() {
            improvements.push(format!(
                "Linked {} entities in BlogPosting about/mentions",
                entities.len()
            ));
        }
        if self.schema.faq_page(post).is_some() {
            improvements.push("Detected FAQ section for FAQPage markup".to_string());
        }
        if self.schema.how_to(post).is_some() {
            improvements.push("Detected numbered steps for HowTo markup".to_string());
        }

        let score = analyze_post(post, entities).score;
        debug!(
            slug = %post.slug,
            score,
            improvements = improvements.len(),
            "Optimized post"
        );

        Ok(OptimizationResult {
            slug: post.slug.clone(),
            success: true,
            original_title: post.title.clone(),
            optimized_title,
            optimized_description,
            keywords,
            schema_valid: validation.valid,
            schema_warnings: validation.warnings,
            score,
            improvements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailmark_core::EntityType;

    fn post() -> BlogPost {
        BlogPost {
            slug: "krabi-islands".into(),
            title: "Island Hopping Around the Limestone Karsts and Hidden Lagoons of the Andaman Coast"
                .into(),
            excerpt: "Boats and beaches.".into(),
            content: "## How do I book a longtail?\n\nAsk at the pier the evening before.\n\n\
                      1. Walk to the pier\n2. Pick a boat\n3. Agree the price"
                .into(),
            tags: vec!["Islands".into()],
            location: Some("Krabi".into()),
            date: "2024-03-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_optimize_long_title() {
        let entities = vec![EntityMention::new(EntityType::Place, "Krabi", 0.95)];
        let result = PostOptimizer::new(SiteConfig::default())
            .optimize(&post(), &entities)
            .unwrap();
        assert!(result.success);
        assert!(result.schema_valid);
        assert!(char_len(&result.optimized_title) <= TITLE_MAX);
        assert!(result.improvements.iter().any(|i| i.starts_with("Shortened title")));
        assert!(result.improvements.iter().any(|i| i.starts_with("Rewrote meta description")));
        assert!(result.improvements.iter().any(|i| i.contains("FAQPage")));
        assert!(result.improvements.iter().any(|i| i.contains("HowTo")));
        assert_eq!(result.keywords[0], "Islands");
        assert!(result.score <= 100);
    }

    #[test]
    fn test_untitled_post_fails() {
        let mut p = post();
        p.title = "  ".into();
        let err = PostOptimizer::new(SiteConfig::default())
            .optimize(&p, &[])
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = PostOptimizer::new(SiteConfig::default())
            .optimize(&post(), &[])
            .unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("originalTitle").is_some());
        assert!(value.get("schemaWarnings").is_some());
    }
}
