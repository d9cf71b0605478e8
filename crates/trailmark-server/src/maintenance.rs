//! Offline maintenance commands: rebuild the tag/location index files and
//! validate a data directory's posts and generated structured data.

use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use trailmark_core::{DataPaths, SiteConfig};
use trailmark_extract::EntityExtractor;
use trailmark_seo::{validate_schema, SchemaGenerator};
use trailmark_store::{ContentStore, PostIndex};

/// Result of a maintenance command.
#[derive(Debug, Default)]
pub struct MaintenanceReport {
    pub posts: usize,
    pub hashtags: usize,
    pub locations: usize,
    pub schemas_checked: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl MaintenanceReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Rebuild `hashtag-index.json` and `location-index.json` from `blog-index.json`.
pub fn reindex(data_dir: &Path) -> MaintenanceReport {
    let mut report = MaintenanceReport::default();

    let paths = match DataPaths::new(data_dir) {
        Ok(p) => p,
        Err(e) => {
            report
                .errors
                .push(format!("Cannot use data directory {}: {}", data_dir.display(), e));
            return report;
        }
    };
    if !paths.blog_index.exists() {
        report
            .warnings
            .push(format!("{} not found; writing empty indexes", paths.blog_index.display()));
    }

    let store = match ContentStore::open(&paths.blog_index) {
        Ok(s) => s,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    let posts = store.list_posts();
    match PostIndex::build(&posts).write(&paths, posts.len()) {
        Ok(summary) => {
            report.posts = summary.posts;
            report.hashtags = summary.hashtags;
            report.locations = summary.locations;
            info!("Reindexed {} posts", summary.posts);
        }
        Err(e) => {
            error!("Failed to write indexes: {}", e);
            report.errors.push(format!("Failed to write indexes: {}", e));
        }
    }
    report
}

/// Load the site config and posts, then validate every schema the server
/// would emit. Schema errors fail the report; warnings do not.
pub fn validate(data_dir: &Path) -> MaintenanceReport {
    let mut report = MaintenanceReport::default();

    let paths = match DataPaths::new(data_dir) {
        Ok(p) => p,
        Err(e) => {
            report
                .errors
                .push(format!("Cannot use data directory {}: {}", data_dir.display(), e));
            return report;
        }
    };

    let site = match SiteConfig::load(&paths.site_config) {
        Ok(site) => site,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };
    if !paths.site_config.exists() {
        report
            .warnings
            .push("site.json not found; using built-in site defaults".to_string());
    }

    let store = match ContentStore::open(&paths.blog_index) {
        Ok(s) => s,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };
    if store.is_empty() {
        report.warnings.push("No posts to validate".to_string());
    }

    match PostIndex::load(&paths) {
        Ok(index) => {
            report.hashtags = index.hashtags.len();
            report.locations = index.locations.len();
        }
        Err(e) => report
            .warnings
            .push(format!("Index files unreadable, run reindex: {}", e)),
    }

    let generator = SchemaGenerator::new(site);
    let extractor = EntityExtractor::new(store.len().max(1), Duration::from_secs(60));

    let mut check = |label: &str, schema: &serde_json::Value| {
        let result = validate_schema(schema);
        report.schemas_checked += 1;
        for e in result.errors {
            report.errors.push(format!("{}: {}", label, e));
        }
        for w in result.warnings {
            report.warnings.push(format!("{}: {}", label, w));
        }
    };

    for schema in generator.site_schemas() {
        check("site", &schema);
    }
    let posts = store.list_posts();
    for post in &posts {
        let entities = extractor.extract(post);
        for schema in generator.graph_for_post(post, &entities) {
            check(&post.slug, &schema);
        }
    }

    report.posts = posts.len();
    report
}

pub fn print_report(report: &MaintenanceReport) {
    println!();
    println!("=== Trailmark Maintenance Report ===");
    println!("Posts:            {}", report.posts);
    println!("Hashtags:         {}", report.hashtags);
    println!("Locations:        {}", report.locations);
    if report.schemas_checked > 0 {
        println!("Schemas checked:  {}", report.schemas_checked);
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.is_ok() {
        println!("Status: OK");
    } else {
        println!("Status: FAILED ({} errors)", report.errors.len());
    }
}
