//! HTML meta tags: title, description, Open Graph, Twitter Card and geo tags.

use std::collections::BTreeMap;

use serde::Serialize;

use trailmark_core::{BlogPost, EntityMention, SiteConfig};
use trailmark_extract::keywords::search_keywords;

use crate::titles::{optimize_description, optimize_title};

const MAX_KEYWORDS: usize = 12;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub og_type: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub site_name: String,
    pub locale: String,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    pub card: String,
    pub site: Option<String>,
    pub creator: Option<String>,
    pub title: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoTags {
    pub placename: String,
    pub position: Option<String>,
    pub icbm: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetaTags {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: String,
    pub robots: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoTags>,
}

impl SeoMetaTags {
    /// Flatten to `name/property → content` pairs.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert("title".into(), self.title.clone());
        m.insert("description".into(), self.description.clone());
        if !self.keywords.is_empty() {
            m.insert("keywords".into(), self.keywords.join(", "));
        }
        m.insert("canonical".into(), self.canonical.clone());
        m.insert("robots".into(), self.robots.clone());

        let og = &self.open_graph;
        m.insert("og:type".into(), og.og_type.clone());
        m.insert("og:title".into(), og.title.clone());
        m.insert("og:description".into(), og.description.clone());
        m.insert("og:url".into(), og.url.clone());
        m.insert("og:image".into(), og.image.clone());
        m.insert("og:site_name".into(), og.site_name.clone());
        m.insert("og:locale".into(), og.locale.clone());
        if let Some(t) = &og.published_time {
            m.insert("article:published_time".into(), t.clone());
        }
        if let Some(t) = &og.modified_time {
            m.insert("article:modified_time".into(), t.clone());
        }
        if !og.tags.is_empty() {
            m.insert("article:tag".into(), og.tags.join(", "));
        }

        let tw = &self.twitter;
        m.insert("twitter:card".into(), tw.card.clone());
        m.insert("twitter:title".into(), tw.title.clone());
        m.insert("twitter:description".into(), tw.description.clone());
        m.insert("twitter:image".into(), tw.image.clone());
        if let Some(s) = &tw.site {
            m.insert("twitter:site".into(), s.clone());
        }
        if let Some(c) = &tw.creator {
            m.insert("twitter:creator".into(), c.clone());
        }

        if let Some(geo) = &self.geo {
            m.insert("geo.placename".into(), geo.placename.clone());
            if let Some(p) = &geo.position {
                m.insert("geo.position".into(), p.clone());
            }
            if let Some(i) = &geo.icbm {
                m.insert("ICBM".into(), i.clone());
            }
        }
        m
    }

    /// Render as `<title>`, `<link rel="canonical">` and `<meta>` elements.
    pub fn to_html(&self) -> String {
        let mut out = Vec::new();
        for (key, value) in self.to_map() {
            let value = escape_html(&value);
            let line = match key.as_str() {
                "title" => format!("<title>{}</title>", value),
                "canonical" => format!("<link rel=\"canonical\" href=\"{}\">", value),
                k if k.starts_with("og:") || k.starts_with("article:") => {
                    format!("<meta property=\"{}\" content=\"{}\">", k, value)
                }
                k => format!("<meta name=\"{}\" content=\"{}\">", k, value),
            };
            out.push(line);
        }
        out.join("\n")
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub struct MetaTagBuilder {
    site: SiteConfig,
}

impl MetaTagBuilder {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn build(&self, post: &BlogPost, entities: &[EntityMention]) -> SeoMetaTags {
        let title = optimize_title(&post.title, post.location.as_deref(), Some(&self.site.name));
        let description = optimize_description(&post.excerpt, &post.content);
        let url = self.site.post_url(&post.slug);
        let image = post
            .images()
            .first()
            .map(|i| self.site.absolute_url(i))
            .unwrap_or_else(|| self.site.absolute_url(&self.site.default_image));

        SeoMetaTags {
            keywords: search_keywords(post, entities, MAX_KEYWORDS),
            canonical: url.clone(),
            robots: "index, follow, max-image-preview:large".to_string(),
            open_graph: OpenGraph {
                og_type: "article".to_string(),
                title: title.clone(),
                description: description.clone(),
                url,
                image: image.clone(),
                site_name: self.site.name.clone(),
                locale: self.site.locale.clone(),
                published_time: Some(post.date.clone()),
                modified_time: post.modified_date.clone(),
                tags: post.tags.clone(),
            },
            twitter: TwitterCard {
                card: "summary_large_image".to_string(),
                site: self.site.twitter_handle.clone(),
                creator: self.site.twitter_handle.clone(),
                title: title.clone(),
                description: description.clone(),
                image,
            },
            geo: geo_tags(post),
            title,
            description,
        }
    }
}

pub fn geo_tags(post: &BlogPost) -> Option<GeoTags> {
    let placename = post.location.as_deref().filter(|l| !l.trim().is_empty())?;
    let coords = post.coordinates_lat_lng();
    Some(GeoTags {
        placename: placename.to_string(),
        position: coords.map(|(lat, lng)| format!("{};{}", lat, lng)),
        icbm: coords.map(|(lat, lng)| format!("{}, {}", lat, lng)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailmark_extract::text::{char_len, ends_with_terminal_punctuation};

    fn post() -> BlogPost {
        BlogPost {
            slug: "chiang-mai-temples".into(),
            title: "Temples & Tea in Chiang Mai".into(),
            excerpt: "Slow mornings among the temples of the old city, ".repeat(6),
            content: String::new(),
            tags: vec!["Thailand".into()],
            location: Some("Chiang Mai".into()),
            coordinates: Some("18.7883,98.9853".into()),
            date: "2024-02-10".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_long_excerpt_description_truncated() {
        let tags = MetaTagBuilder::new(SiteConfig::default()).build(&post(), &[]);
        assert!(char_len(&post().excerpt) >= 300);
        assert!(char_len(&tags.description) <= 160);
        assert!(ends_with_terminal_punctuation(&tags.description));
        assert!(char_len(&tags.title) <= 60);
    }

    #[test]
    fn test_open_graph_and_geo() {
        let tags = MetaTagBuilder::new(SiteConfig::default()).build(&post(), &[]);
        assert_eq!(tags.open_graph.url, "https://example.com/blog/chiang-mai-temples");
        assert_eq!(tags.open_graph.image, SiteConfig::default().default_image);
        let map = tags.to_map();
        assert_eq!(map["geo.position"], "18.7883;98.9853");
        assert_eq!(map["ICBM"], "18.7883, 98.9853");
        assert_eq!(map["twitter:card"], "summary_large_image");
        assert_eq!(map["article:published_time"], "2024-02-10");
    }

    #[test]
    fn test_no_location_no_geo() {
        let mut p = post();
        p.location = None;
        let tags = MetaTagBuilder::new(SiteConfig::default()).build(&p, &[]);
        assert!(tags.geo.is_none());
        assert!(!tags.to_map().contains_key("geo.placename"));
    }

    #[test]
    fn test_html_is_escaped() {
        let tags = MetaTagBuilder::new(SiteConfig::default()).build(&post(), &[]);
        let html = tags.to_html();
        assert!(html.contains("<title>Temples &amp; Tea in Chiang Mai"));
        assert!(html.contains("<meta property=\"og:type\" content=\"article\">"));
        assert!(!html.contains("& Tea"));
    }
}
