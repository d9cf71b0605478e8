//! Liveness and service summary.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::envelope;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /api/health
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let graph = state.graph_snapshot.read().clone();
    envelope(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": state.started_at.elapsed().as_secs(),
        "site": state.site.name,
        "content": state.store.stats(),
        "entityCache": {
            "posts": state.extractor.cached_posts(),
            "maxPosts": state.config.entity_cache_size,
            "ttlSeconds": state.config.entity_cache_ttl_secs,
        },
        "knowledgeGraph": graph,
        "analyticsMode": trailmark_analytics::MOCK_MODE,
    }))
}
