//! `/api/seo/phase9`: batch post optimization and its stored results.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{envelope_with, slugs_from_body, MAX_BATCH_SLUGS};
use crate::error::ApiResult;
use crate::state::{AppState, OptimizationRun, OptimizeOutcome};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seo/phase9/optimize", post(optimize_posts))
        .route("/seo/phase9/results", get(list_results))
}

/// POST /api/seo/phase9/optimize with `{"slugs": [...]}`.
///
/// Repeated slugs are merged, so each distinct slug yields at most one
/// entry. Unknown slugs are skipped without an entry; a post that fails to
/// optimize gets `{slug, success: false, error}`.
async fn optimize_posts(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let slugs = slugs_from_body(&body, MAX_BATCH_SLUGS)?;

    let mut posts = Vec::with_capacity(slugs.len());
    let mut skipped = Vec::new();
    for slug in &slugs {
        match state.store.get_post(slug) {
            Some(post) => posts.push(post),
            None => skipped.push(slug.clone()),
        }
    }

    let mut entities = state.entities_for_posts(posts.clone()).await;
    let results: Vec<OptimizeOutcome> = posts
        .iter()
        .map(|post| {
            let mentions = entities.remove(&post.slug).unwrap_or_default();
            match state.optimizer.optimize(post, &mentions) {
                Ok(result) => OptimizeOutcome::Optimized(result),
                Err(e) => {
                    warn!("Optimization failed for {}: {}", post.slug, e);
                    OptimizeOutcome::failed(&post.slug, e.to_string())
                }
            }
        })
        .collect();

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    let failed = results.len() - succeeded;
    let run = OptimizationRun {
        id: uuid::Uuid::new_v4().to_string(),
        completed_at: chrono::Utc::now().to_rfc3339(),
        requested: slugs.len(),
        skipped: skipped.clone(),
        results: results.clone(),
    };
    info!(
        "Optimization run {}: {} succeeded, {} failed, {} skipped",
        run.id,
        succeeded,
        failed,
        skipped.len()
    );
    let run_id = run.id.clone();
    state.record_optimization_run(run);

    Ok(envelope_with(
        json!(results),
        json!({
            "runId": run_id,
            "requested": slugs.len(),
            "processed": results.len(),
            "succeeded": succeeded,
            "failed": failed,
            "skipped": skipped,
        }),
    ))
}

/// GET /api/seo/phase9/results, newest run first.
async fn list_results(State(state): State<Arc<AppState>>) -> Json<Value> {
    let runs = state.optimization_runs();
    let total = runs.len();
    envelope_with(json!(runs), json!({ "totalRuns": total }))
}
