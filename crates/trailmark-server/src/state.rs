//! Shared application state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::Serialize;

use trailmark_analytics::{MockAnalytics, VitalsCollector};
use trailmark_core::{BlogPost, EntityMention, Result, ServerConfig, SiteConfig};
use trailmark_extract::{extract_batch, EntityExtractor};
use trailmark_seo::{LocalSeoOptimizer, MetaTagBuilder, OptimizationResult, PostOptimizer, SchemaGenerator};
use trailmark_store::{ContentStore, GraphStats};

/// Optimization runs kept for `GET /api/seo/phase9/results`.
const MAX_OPTIMIZATION_RUNS: usize = 20;

/// Outcome for one slug of a batch optimization.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OptimizeOutcome {
    Optimized(OptimizationResult),
    Failed {
        slug: String,
        success: bool,
        error: String,
    },
}

impl OptimizeOutcome {
    pub fn failed(slug: impl Into<String>, error: impl Into<String>) -> Self {
        OptimizeOutcome::Failed {
            slug: slug.into(),
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OptimizeOutcome::Optimized(_))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRun {
    pub id: String,
    pub completed_at: String,
    pub requested: usize,
    pub skipped: Vec<String>,
    pub results: Vec<OptimizeOutcome>,
}

/// Summary of the most recent knowledge-graph rebuild.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub built_at: String,
    #[serde(flatten)]
    pub stats: GraphStats,
}

/// Shared application state accessible from all route handlers.
///
/// Every generator is built once here from the site configuration and
/// borrowed by handlers through `Arc<AppState>`.
pub struct AppState {
    pub config: ServerConfig,
    pub site: SiteConfig,
    pub store: ContentStore,
    pub extractor: Arc<EntityExtractor>,
    pub schema: SchemaGenerator,
    pub meta: MetaTagBuilder,
    pub local: LocalSeoOptimizer,
    pub optimizer: PostOptimizer,
    pub analytics: MockAnalytics,
    pub vitals: VitalsCollector,
    pub optimization_runs: RwLock<VecDeque<OptimizationRun>>,
    pub graph_snapshot: RwLock<Option<GraphSnapshot>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, site: SiteConfig, store: ContentStore) -> Self {
        let extractor = Arc::new(EntityExtractor::new(
            config.entity_cache_size,
            config.entity_cache_ttl(),
        ));
        let analytics = MockAnalytics::new(config.analytics_seed);

        Self {
            schema: SchemaGenerator::new(site.clone()),
            meta: MetaTagBuilder::new(site.clone()),
            local: LocalSeoOptimizer::new(site.clone()),
            optimizer: PostOptimizer::new(site.clone()),
            vitals: VitalsCollector::default(),
            optimization_runs: RwLock::new(VecDeque::new()),
            graph_snapshot: RwLock::new(None),
            started_at: Instant::now(),
            config,
            site,
            store,
            extractor,
            analytics,
        }
    }

    /// Load `site.json` and `blog-index.json` from the configured data directory.
    pub fn load(config: ServerConfig) -> Result<Self> {
        let site = SiteConfig::load(&config.data_paths.site_config)?;
        let store = ContentStore::open(&config.data_paths.blog_index)?;
        Ok(Self::new(config, site, store))
    }

    /// Cached entities for a single post.
    pub fn entities_for(&self, post: &BlogPost) -> Vec<EntityMention> {
        self.extractor.extract(post)
    }

    /// Entities for many posts, extracted concurrently.
    pub async fn entities_for_posts(
        &self,
        posts: Vec<BlogPost>,
    ) -> HashMap<String, Vec<EntityMention>> {
        extract_batch(self.extractor.clone(), posts).await
    }

    pub fn record_optimization_run(&self, run: OptimizationRun) {
        let mut runs = self.optimization_runs.write();
        runs.push_front(run);
        runs.truncate(MAX_OPTIMIZATION_RUNS);
    }

    pub fn optimization_runs(&self) -> Vec<OptimizationRun> {
        self.optimization_runs.read().iter().cloned().collect()
    }
}
