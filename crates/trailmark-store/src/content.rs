//! Read-only blog content store backed by `blog-index.json`.
//!
//! Posts are loaded once at startup (or on `reload`) and handed out as
//! clones; nothing in the enrichment pipeline mutates them.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::types::StoreStats;
use trailmark_core::{BlogPost, Error, Result};

pub struct ContentStore {
    inner: RwLock<Posts>,
    index_path: Option<PathBuf>,
}

#[derive(Default)]
struct Posts {
    /// Newest first.
    ordered: Vec<BlogPost>,
    by_slug: HashMap<String, usize>,
}

impl Posts {
    fn build(mut posts: Vec<BlogPost>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let mut ordered = Vec::with_capacity(posts.len());
        let mut by_slug = HashMap::with_capacity(posts.len());
        for mut post in posts {
            if post.slug.trim().is_empty() {
                warn!("Skipping post without slug: {:?}", post.title);
                continue;
            }
            if by_slug.contains_key(&post.slug) {
                warn!("Duplicate slug {}, keeping the newest", post.slug);
                continue;
            }
            post.normalize_tags();
            by_slug.insert(post.slug.clone(), ordered.len());
            ordered.push(post);
        }
        Self { ordered, by_slug }
    }
}

impl ContentStore {
    /// Open the store from a `blog-index.json` file. A missing file yields an empty store.
    pub fn open(index_path: impl AsRef<Path>) -> Result<Self> {
        let index_path = index_path.as_ref().to_path_buf();
        let posts = Self::read_index(&index_path)?;
        let store = Self {
            inner: RwLock::new(Posts::build(posts)),
            index_path: Some(index_path),
        };
        info!(
            "ContentStore initialized: {} posts from {}",
            store.len(),
            store.index_path_display()
        );
        Ok(store)
    }

    /// In-memory store, used by tests and ad-hoc tooling.
    pub fn from_posts(posts: Vec<BlogPost>) -> Self {
        Self {
            inner: RwLock::new(Posts::build(posts)),
            index_path: None,
        }
    }

    fn read_index(path: &Path) -> Result<Vec<BlogPost>> {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| Error::Content(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Blog index {} not found, starting empty", path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Re-read the index file, replacing all posts. Returns the new post count.
    pub fn reload(&self) -> Result<usize> {
        let Some(path) = &self.index_path else {
            return Ok(self.len());
        };
        let posts = Posts::build(Self::read_index(path)?);
        let count = posts.ordered.len();
        *self.inner.write() = posts;
        info!("Reloaded {} posts", count);
        Ok(count)
    }

    pub fn get_post(&self, slug: &str) -> Option<BlogPost> {
        let inner = self.inner.read();
        inner.by_slug.get(slug).map(|&i| inner.ordered[i].clone())
    }

    /// Like `get_post`, but a missing slug is an `Error::NotFound`.
    pub fn require_post(&self, slug: &str) -> Result<BlogPost> {
        self.get_post(slug)
            .ok_or_else(|| Error::NotFound(format!("Post '{}' not found", slug)))
    }

    /// All posts, newest first.
    pub fn list_posts(&self) -> Vec<BlogPost> {
        self.inner.read().ordered.clone()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.inner.read().by_slug.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.inner.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let tags: BTreeSet<String> = inner
            .ordered
            .iter()
            .flat_map(|p| p.tags.iter().map(|t| t.to_lowercase()))
            .collect();
        let locations: BTreeSet<&str> = inner
            .ordered
            .iter()
            .filter_map(|p| p.location.as_deref())
            .collect();
        StoreStats {
            total_posts: inner.ordered.len(),
            total_tags: tags.len(),
            total_locations: locations.len(),
            posts_with_gallery: inner
                .ordered
                .iter()
                .filter(|p| !p.images().is_empty())
                .count(),
            index_path: self.index_path_display(),
        }
    }

    fn index_path_display(&self) -> String {
        self.index_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn post(slug: &str, date: &str) -> BlogPost {
        BlogPost {
            slug: slug.into(),
            title: format!("Post {}", slug),
            date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_index_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path().join("blog-index.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_and_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog-index.json");
        let posts = vec![post("old", "2023-01-01"), post("new", "2024-06-01")];
        std::fs::write(&path, serde_json::to_string(&posts).unwrap()).unwrap();

        let store = ContentStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list_posts()[0].slug, "new");
        assert_eq!(store.get_post("old").unwrap().title, "Post old");
        assert!(store.get_post("missing").is_none());
        assert!(matches!(store.require_post("missing"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_duplicate_and_blank_slugs_dropped() {
        let store = ContentStore::from_posts(vec![
            post("a", "2024-01-02"),
            post("a", "2024-01-01"),
            post("", "2024-01-03"),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_post("a").unwrap().date, "2024-01-02");
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog-index.json");
        std::fs::write(&path, "[]").unwrap();
        let store = ContentStore::open(&path).unwrap();
        assert!(store.is_empty());

        std::fs::write(&path, serde_json::to_string(&vec![post("x", "2024-02-02")]).unwrap())
            .unwrap();
        assert_eq!(store.reload().unwrap(), 1);
        assert!(store.contains("x"));
    }

    #[test]
    fn test_malformed_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog-index.json");
        std::fs::write(&path, "{\"oops\": true}").unwrap();
        assert!(matches!(ContentStore::open(&path), Err(Error::Content(_))));
    }

    #[test]
    fn test_stats() {
        let mut a = post("a", "2024-01-01");
        a.tags = vec!["Food".into(), "Thailand".into()];
        a.location = Some("Bangkok".into());
        a.gallery = Some(vec!["/img/1.jpg".into()]);
        let mut b = post("b", "2024-01-02");
        b.tags = vec!["food".into()];
        let stats = ContentStore::from_posts(vec![a, b]).stats();
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.total_tags, 2);
        assert_eq!(stats.total_locations, 1);
        assert_eq!(stats.posts_with_gallery, 1);
    }
}
