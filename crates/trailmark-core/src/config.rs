//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Paths to the files Trailmark reads and writes inside its data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Published posts (`data/blog-index.json`).
    pub blog_index: PathBuf,
    /// Tag → slugs index (`data/hashtag-index.json`).
    pub hashtag_index: PathBuf,
    /// Location → slugs index (`data/location-index.json`).
    pub location_index: PathBuf,
    /// Site-wide SEO settings (`data/site.json`).
    pub site_config: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the root if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            blog_index: root.join("blog-index.json"),
            hashtag_index: root.join("hashtag-index.json"),
            location_index: root.join("location-index.json"),
            site_config: root.join("site.json"),
            root,
        })
    }
}

/// Process-level settings taken from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Maximum number of posts whose extracted entities stay cached.
    pub entity_cache_size: usize,
    /// Lifetime of a cached extraction, in seconds.
    pub entity_cache_ttl_secs: u64,
    /// Fixed seed for the mock analytics generator.
    pub analytics_seed: Option<u64>,
}

impl ServerConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = env_parse("PORT").unwrap_or(3000);
        let entity_cache_size = env_parse("TRAILMARK_ENTITY_CACHE_SIZE").unwrap_or(500);
        let entity_cache_ttl_secs = env_parse("TRAILMARK_ENTITY_CACHE_TTL_SECS").unwrap_or(3600);
        let analytics_seed = env_parse("TRAILMARK_ANALYTICS_SEED");

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            entity_cache_size,
            entity_cache_ttl_secs,
            analytics_seed,
        })
    }

    pub fn entity_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.entity_cache_ttl_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// The blog author, rendered as the schema.org `Person`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorProfile {
    pub name: String,
    pub url: String,
    pub image: Option<String>,
    pub job_title: Option<String>,
    pub description: Option<String>,
    pub knows_about: Vec<String>,
}

impl Default for AuthorProfile {
    fn default() -> Self {
        Self {
            name: "Site Author".to_string(),
            url: "https://example.com/about".to_string(),
            image: None,
            job_title: Some("Travel Writer & Photographer".to_string()),
            description: None,
            knows_about: vec![
                "Travel".to_string(),
                "Photography".to_string(),
                "Southeast Asia".to_string(),
            ],
        }
    }
}

/// Business details for `LocalBusiness` / `ProfessionalService` markup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub name: String,
    /// When set, the business is emitted as a `ProfessionalService`.
    pub service_type: Option<String>,
    pub description: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price_range: Option<String>,
    pub area_served: Vec<String>,
    pub opening_hours: Vec<String>,
}

/// Site-wide settings consumed by the schema and meta generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub name: String,
    /// Canonical origin without a trailing slash.
    pub url: String,
    pub description: String,
    pub locale: String,
    pub language: String,
    pub default_image: String,
    pub logo: String,
    pub twitter_handle: Option<String>,
    pub author: AuthorProfile,
    /// Profile URLs emitted as `sameAs`.
    pub social_profiles: Vec<String>,
    pub business: Option<BusinessProfile>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Trailmark Travel Blog".to_string(),
            url: "https://example.com".to_string(),
            description: "Travel stories, food guides and photography from the road."
                .to_string(),
            locale: "en_US".to_string(),
            language: "en".to_string(),
            default_image: "https://example.com/images/og-default.jpg".to_string(),
            logo: "https://example.com/images/logo.png".to_string(),
            twitter_handle: None,
            author: AuthorProfile::default(),
            social_profiles: Vec::new(),
            business: None,
        }
    }
}

impl SiteConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No site config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut config: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.url = config.url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Absolute URL for a site path such as `/blog/slug`.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.url, path)
        } else {
            format!("{}/{}", self.url, path)
        }
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/blog/{}", self.url, slug)
    }
}
