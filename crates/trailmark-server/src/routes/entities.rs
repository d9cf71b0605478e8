//! Entity extraction and knowledge-graph routes.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use trailmark_store::KnowledgeGraph;

use super::{envelope, envelope_with, slugs_from_body, MAX_BATCH_SLUGS};
use crate::error::ApiResult;
use crate::state::{AppState, GraphSnapshot};

const DEFAULT_GRAPH_LIMIT: usize = 50;
const MAX_GRAPH_LIMIT: usize = 500;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/entities/batch", post(batch_entities))
        .route("/entities/cache/clear", post(clear_cache))
        .route("/entities/{slug}", get(get_entities))
        .route("/knowledge-graph", get(knowledge_graph))
}

#[derive(Debug, Deserialize)]
struct GraphQuery {
    limit: Option<usize>,
}

/// GET /api/entities/{slug}
async fn get_entities(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    let post = state.store.require_post(&slug)?;
    let entities = state.entities_for(&post);
    Ok(envelope_with(
        json!({ "slug": post.slug, "entities": entities }),
        json!({ "count": entities.len() }),
    ))
}

/// POST /api/entities/batch with `{"slugs": [...]}`. Unknown slugs are
/// listed under `metadata.skipped`.
async fn batch_entities(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let slugs = slugs_from_body(&body, MAX_BATCH_SLUGS)?;

    let (posts, skipped): (Vec<_>, Vec<_>) = slugs
        .iter()
        .map(|slug| (slug, state.store.get_post(slug)))
        .partition(|(_, post)| post.is_some());
    let posts: Vec<_> = posts.into_iter().filter_map(|(_, post)| post).collect();
    let skipped: Vec<&String> = skipped.into_iter().map(|(slug, _)| slug).collect();

    let results = state.entities_for_posts(posts).await;
    let processed = results.len();
    Ok(envelope_with(
        json!(results),
        json!({ "processed": processed, "skipped": skipped }),
    ))
}

/// POST /api/entities/cache/clear
async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cleared = state.extractor.clear_cache();
    info!("Cleared {} cached entity lists", cleared);
    envelope(json!({ "cleared": cleared }))
}

/// GET /api/knowledge-graph?limit=N
///
/// Rebuilt from every post on each call; the stats of the last build are
/// kept for `/api/health`.
async fn knowledge_graph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> Json<Value> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_GRAPH_LIMIT)
        .clamp(1, MAX_GRAPH_LIMIT);

    let entities_by_post = state.entities_for_posts(state.store.list_posts()).await;
    let graph = KnowledgeGraph::build(&entities_by_post);
    let stats = graph.stats();

    let top = graph.top_entities(limit);
    let included: BTreeSet<&str> = top.iter().map(|e| e.id.as_str()).collect();
    let edges: Vec<Value> = top
        .iter()
        .flat_map(|entity| {
            entity
                .connections
                .iter()
                .filter(|other| entity.id.as_str() < other.as_str() && included.contains(other.as_str()))
                .map(|other| json!({ "source": entity.id, "target": other }))
                .collect::<Vec<_>>()
        })
        .collect();

    *state.graph_snapshot.write() = Some(GraphSnapshot {
        built_at: chrono::Utc::now().to_rfc3339(),
        stats: stats.clone(),
    });

    envelope_with(
        json!({ "entities": top, "edges": edges }),
        json!({ "stats": stats, "limit": limit }),
    )
}
