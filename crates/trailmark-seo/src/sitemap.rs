//! sitemaps.org sitemap with the Google image extension.

use std::collections::BTreeMap;

use serde::Serialize;

use trailmark_core::{hashtag_key, BlogPost, SiteConfig};

use crate::meta::escape_html;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub loc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    pub changefreq: &'static str,
    pub priority: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

/// `YYYY-MM-DD` prefix of a date or timestamp string.
fn w3c_date(date: &str) -> Option<String> {
    let day = date.get(..10)?;
    let bytes = day.as_bytes();
    let shaped = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    shaped.then(|| day.to_string())
}

impl Sitemap {
    pub fn build(site: &SiteConfig, posts: &[BlogPost]) -> Self {
        let latest = posts
            .iter()
            .filter_map(|p| w3c_date(p.modified_or_published()))
            .max();

        let mut entries = vec![
            SitemapEntry {
                loc: format!("{}/", site.url),
                lastmod: latest.clone(),
                changefreq: "daily",
                priority: 1.0,
                images: Vec::new(),
            },
            SitemapEntry {
                loc: format!("{}/blog", site.url),
                lastmod: latest,
                changefreq: "daily",
                priority: 0.9,
                images: Vec::new(),
            },
        ];

        let mut tags: BTreeMap<String, Option<String>> = BTreeMap::new();
        for post in posts {
            let lastmod = w3c_date(post.modified_or_published());
            entries.push(SitemapEntry {
                loc: site.post_url(&post.slug),
                lastmod: lastmod.clone(),
                changefreq: "monthly",
                priority: 0.8,
                images: post.images().iter().map(|i| site.absolute_url(i)).collect(),
            });
            for tag in &post.tags {
                let key = hashtag_key(tag);
                if key.is_empty() {
                    continue;
                }
                let slot = tags.entry(key).or_insert(None);
                if lastmod > *slot {
                    *slot = lastmod.clone();
                }
            }
        }

        for (tag, lastmod) in tags {
            entries.push(SitemapEntry {
                loc: format!("{}/tags/{}", site.url, tag),
                lastmod,
                changefreq: "weekly",
                priority: 0.5,
                images: Vec::new(),
            });
        }

        Self { entries }
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
             xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">\n",
        );
        for entry in &self.entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_html(&entry.loc)));
            if let Some(lastmod) = &entry.lastmod {
                xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
            }
            xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            for image in &entry.images {
                xml.push_str(&format!(
                    "    <image:image><image:loc>{}</image:loc></image:image>\n",
                    escape_html(image)
                ));
            }
            xml.push_str("  </url>\n");
        }
        xml.push_str("</urlset>\n");
        xml
    }
}
