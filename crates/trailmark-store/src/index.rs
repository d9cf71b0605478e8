//! Hashtag and location indexes written next to `blog-index.json`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use trailmark_core::{hashtag_key, BlogPost, DataPaths, Result};

/// Tag → slugs and location → slugs lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostIndex {
    pub hashtags: BTreeMap<String, BTreeSet<String>>,
    pub locations: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub posts: usize,
    pub hashtags: usize,
    pub locations: usize,
}

impl PostIndex {
    pub fn build(posts: &[BlogPost]) -> Self {
        let mut index = Self::default();
        for post in posts {
            for tag in &post.tags {
                let key = hashtag_key(tag);
                if key.is_empty() {
                    continue;
                }
                index
                    .hashtags
                    .entry(key)
                    .or_default()
                    .insert(post.slug.clone());
            }
            if let Some(location) = post.location.as_deref().map(str::trim) {
                if !location.is_empty() {
                    index
                        .locations
                        .entry(location.to_string())
                        .or_default()
                        .insert(post.slug.clone());
                }
            }
        }
        index
    }

    pub fn posts_for_tag(&self, tag: &str) -> Vec<String> {
        self.hashtags
            .get(&hashtag_key(tag))
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Write both index files. Returns a summary for the CLI.
    pub fn write(&self, paths: &DataPaths, post_count: usize) -> Result<IndexReport> {
        write_json(&paths.hashtag_index, &self.hashtags)?;
        write_json(&paths.location_index, &self.locations)?;
        info!(
            "Wrote {} hashtags and {} locations",
            self.hashtags.len(),
            self.locations.len()
        );
        Ok(IndexReport {
            posts: post_count,
            hashtags: self.hashtags.len(),
            locations: self.locations.len(),
        })
    }

    /// Load previously written index files. Missing files load as empty maps.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        Ok(Self {
            hashtags: read_json(&paths.hashtag_index)?,
            locations: read_json(&paths.location_index)?,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    std::fs::write(path, data)?;
    Ok(())
}

fn read_json(path: &Path) -> Result<BTreeMap<String, BTreeSet<String>>> {
    match std::fs::read_to_string(path) {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, tags: &[&str], location: Option<&str>) -> BlogPost {
        BlogPost {
            slug: slug.into(),
            title: slug.into(),
            date: "2024-01-01".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            location: location.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_index() {
        let posts = vec![
            post("a", &["Thailand", "Street Food"], Some("Bangkok")),
            post("b", &["thailand"], Some("Chiang Mai")),
            post("c", &[], None),
        ];
        let index = PostIndex::build(&posts);
        assert_eq!(index.posts_for_tag("Thailand"), vec!["a", "b"]);
        assert_eq!(index.posts_for_tag("#street food"), vec!["a"]);
        assert_eq!(index.locations.len(), 2);
        assert!(index.posts_for_tag("nothing").is_empty());
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        let index = PostIndex::build(&[post("a", &["beach"], Some("Krabi"))]);
        let report = index.write(&paths, 1).unwrap();
        assert_eq!(report.hashtags, 1);
        assert_eq!(report.locations, 1);
        assert_eq!(PostIndex::load(&paths).unwrap(), index);
    }
}
