//! schema.org JSON-LD generators.
//!
//! One `SchemaGenerator` is built at startup from the site configuration
//! and shared by every request. Optional post fields (location, gallery,
//! coordinates) are omitted or defaulted, never treated as errors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use trailmark_core::{BlogPost, EntityMention, SiteConfig};
use trailmark_extract::text::{split_sentences, strip_markdown, truncate_words};

use crate::titles::optimize_description;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
/// Google's headline limit for article rich results.
pub const HEADLINE_MAX: usize = 110;

static FAQ_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{2,4}\s+(.+\?)\s*$").unwrap());
static STEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s+(.+)$").unwrap());

pub struct SchemaGenerator {
    site: SiteConfig,
}

impl SchemaGenerator {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    fn id(&self, fragment: &str) -> String {
        format!("{}/#{}", self.site.url, fragment)
    }

    fn post_id(&self, post: &BlogPost) -> String {
        format!("{}#article", self.site.post_url(&post.slug))
    }

    pub fn person(&self) -> Value {
        let author = &self.site.author;
        let mut person = json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Person",
            "@id": self.id("person"),
            "name": author.name,
            "url": author.url,
        });
        if let Some(obj) = person.as_object_mut() {
            insert_opt(obj, "image", author.image.as_deref());
            insert_opt(obj, "jobTitle", author.job_title.as_deref());
            insert_opt(obj, "description", author.description.as_deref());
            if !author.knows_about.is_empty() {
                obj.insert("knowsAbout".into(), json!(author.knows_about));
            }
            if !self.site.social_profiles.is_empty() {
                obj.insert("sameAs".into(), json!(self.site.social_profiles));
            }
        }
        person
    }

    pub fn website(&self) -> Value {
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "WebSite",
            "@id": self.id("website"),
            "name": self.site.name,
            "url": self.site.url,
            "description": self.site.description,
            "inLanguage": self.site.language,
            "publisher": { "@id": self.id("organization") },
            "potentialAction": {
                "@type": "SearchAction",
                "target": {
                    "@type": "EntryPoint",
                    "urlTemplate": format!("{}/search?q={{search_term_string}}", self.site.url),
                },
                "query-input": "required name=search_term_string",
            },
        })
    }

    pub fn organization(&self) -> Value {
        let mut org = json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Organization",
            "@id": self.id("organization"),
            "name": self.site.name,
            "url": self.site.url,
            "logo": {
                "@type": "ImageObject",
                "url": self.site.absolute_url(&self.site.logo),
            },
            "founder": { "@id": self.id("person") },
        });
        if !self.site.social_profiles.is_empty() {
            if let Some(obj) = org.as_object_mut() {
                obj.insert("sameAs".into(), json!(self.site.social_profiles));
            }
        }
        org
    }

    /// Absolute image URLs for a post, or the site default.
    pub fn post_images(&self, post: &BlogPost) -> Vec<String> {
        let images: Vec<String> = post
            .images()
            .iter()
            .map(|i| self.site.absolute_url(i))
            .collect();
        if images.is_empty() {
            vec![self.site.absolute_url(&self.site.default_image)]
        } else {
            images
        }
    }

    pub fn blog_posting(&self, post: &BlogPost, entities: &[EntityMention]) -> Value {
        let url = self.site.post_url(&post.slug);
        let mut article = json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "BlogPosting",
            "@id": self.post_id(post),
            "headline": truncate_words(&post.title, HEADLINE_MAX, "..."),
            "description": optimize_description(&post.excerpt, &post.content),
            "image": self.post_images(post),
            "author": {
                "@type": "Person",
                "@id": self.id("person"),
                "name": self.site.author.name,
                "url": self.site.author.url,
            },
            "publisher": {
                "@type": "Organization",
                "@id": self.id("organization"),
                "name": self.site.name,
                "logo": {
                    "@type": "ImageObject",
                    "url": self.site.absolute_url(&self.site.logo),
                },
            },
            "datePublished": post.date,
            "dateModified": post.modified_or_published(),
            "mainEntityOfPage": { "@type": "WebPage", "@id": url },
            "url": url,
            "inLanguage": self.site.language,
            "wordCount": post.word_count(),
        });

        let mut about = Vec::new();
        let mut mentions = Vec::new();
        for entity in entities {
            let thing = json!({
                "@type": entity.entity_type.schema_type(),
                "name": entity.name,
            });
            if entity.confidence >= 0.9 {
                about.push(thing);
            } else {
                mentions.push(thing);
            }
        }

        if let Some(obj) = article.as_object_mut() {
            if !post.tags.is_empty() {
                obj.insert("keywords".into(), json!(post.tags.join(", ")));
            }
            if let Some(place) = self.place(post) {
                obj.insert("contentLocation".into(), place);
            }
            if !about.is_empty() {
                obj.insert("about".into(), Value::Array(about));
            }
            if !mentions.is_empty() {
                obj.insert("mentions".into(), Value::Array(mentions));
            }
        }
        article
    }

    /// `Place` for the post's location, with `GeoCoordinates` when parseable.
    pub fn place(&self, post: &BlogPost) -> Option<Value> {
        let name = post.location.as_deref().filter(|l| !l.trim().is_empty())?;
        let mut place = json!({ "@type": "Place", "name": name });
        if let (Some((lat, lng)), Some(obj)) = (post.coordinates_lat_lng(), place.as_object_mut()) {
            obj.insert(
                "geo".into(),
                json!({ "@type": "GeoCoordinates", "latitude": lat, "longitude": lng }),
            );
        }
        Some(place)
    }

    pub fn image_objects(&self, post: &BlogPost) -> Vec<Value> {
        post.images()
            .iter()
            .enumerate()
            .map(|(i, image)| {
                let url = self.site.absolute_url(image);
                let mut caption = format!("{}, photo {}", post.title, i + 1);
                if let Some(location) = &post.location {
                    caption = format!("{} ({})", caption, location);
                }
                json!({
                    "@context": SCHEMA_CONTEXT,
                    "@type": "ImageObject",
                    "@id": format!("{}#image-{}", self.site.post_url(&post.slug), i + 1),
                    "contentUrl": url,
                    "url": url,
                    "caption": caption,
                    "creator": { "@type": "Person", "name": self.site.author.name },
                    "copyrightHolder": { "@type": "Person", "name": self.site.author.name },
                    "creditText": self.site.author.name,
                    "copyrightNotice": format!("© {}", self.site.author.name),
                    "acquireLicensePage": format!("{}/contact", self.site.url),
                })
            })
            .collect()
    }

    /// FAQ from `## Question?` headings followed by answer text.
    /// `None` when the post has no such pairs.
    pub fn faq_page(&self, post: &BlogPost) -> Option<Value> {
        let pairs = faq_pairs(&post.content);
        if pairs.is_empty() {
            return None;
        }
        let questions: Vec<Value> = pairs
            .into_iter()
            .map(|(q, a)| {
                json!({
                    "@type": "Question",
                    "name": q,
                    "acceptedAnswer": { "@type": "Answer", "text": a },
                })
            })
            .collect();
        Some(json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "FAQPage",
            "@id": format!("{}#faq", self.site.post_url(&post.slug)),
            "mainEntity": questions,
        }))
    }

    /// HowTo from a numbered list. `None` with fewer than two steps.
    pub fn how_to(&self, post: &BlogPost) -> Option<Value> {
        let steps: Vec<String> = post
            .content
            .lines()
            .filter_map(|line| STEP_RE.captures(line))
            .filter_map(|c| c.get(1).map(|m| strip_markdown(m.as_str())))
            .filter(|s| !s.is_empty())
            .collect();
        if steps.len() < 2 {
            return None;
        }
        let step_values: Vec<Value> = steps
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let name = split_sentences(text)
                    .first()
                    .map(|s| truncate_words(s, 80, "..."))
                    .unwrap_or_else(|| text.clone());
                json!({
                    "@type": "HowToStep",
                    "position": i + 1,
                    "name": name,
                    "text": text,
                })
            })
            .collect();
        Some(json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "HowTo",
            "@id": format!("{}#howto", self.site.post_url(&post.slug)),
            "name": post.title,
            "description": optimize_description(&post.excerpt, &post.content),
            "image": self.post_images(post).first(),
            "step": step_values,
        }))
    }

    pub fn breadcrumb(&self, post: &BlogPost) -> Value {
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "BreadcrumbList",
            "@id": format!("{}#breadcrumb", self.site.post_url(&post.slug)),
            "itemListElement": [
                { "@type": "ListItem", "position": 1, "name": "Home", "item": self.site.url },
                { "@type": "ListItem", "position": 2, "name": "Blog", "item": format!("{}/blog", self.site.url) },
                { "@type": "ListItem", "position": 3, "name": post.title, "item": self.site.post_url(&post.slug) },
            ],
        })
    }

    /// Site-level objects rendered on every page.
    pub fn site_schemas(&self) -> Vec<Value> {
        vec![self.person(), self.website(), self.organization()]
    }

    /// Every applicable object for a post page.
    pub fn graph_for_post(&self, post: &BlogPost, entities: &[EntityMention]) -> Vec<Value> {
        let mut out = vec![self.blog_posting(post, entities), self.breadcrumb(post)];
        out.extend(self.image_objects(post));
        out.extend(self.faq_page(post));
        out.extend(self.how_to(post));
        out
    }
}

fn insert_opt(obj: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        obj.insert(key.to_string(), Value::String(v.to_string()));
    }
}

/// `(question, answer)` pairs from question headings and the text under them.
fn faq_pairs(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in content.lines() {
        if let Some(caps) = FAQ_HEADING_RE.captures(line.trim()) {
            if let Some((q, answer)) = current.take() {
                push_pair(&mut pairs, q, &answer);
            }
            current = Some((caps[1].trim().to_string(), Vec::new()));
        } else if line.trim_start().starts_with('#') {
            if let Some((q, answer)) = current.take() {
                push_pair(&mut pairs, q, &answer);
            }
        } else if let Some((_, answer)) = current.as_mut() {
            answer.push(line);
        }
    }
    if let Some((q, answer)) = current {
        push_pair(&mut pairs, q, &answer);
    }
    pairs
}

fn push_pair(pairs: &mut Vec<(String, String)>, question: String, answer: &[&str]) {
    let text = strip_markdown(&answer.join("\n"));
    if !text.is_empty() {
        pairs.push((question, text));
    }
}
