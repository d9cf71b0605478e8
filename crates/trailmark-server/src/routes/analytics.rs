//! `/api/seo/analytics`: mock dashboards plus real Core Web Vitals reports.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use trailmark_analytics::{VitalMetric, MOCK_MODE};
use trailmark_extract::keywords::search_keywords;

use super::envelope_with;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Keywords reported when no slug narrows the request.
const SITE_KEYWORDS: usize = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/seo/analytics", get(get_analytics).post(report_vital))
}

#[derive(Debug, Deserialize)]
struct AnalyticsQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    slug: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VitalReport {
    metric: String,
    value: f64,
    page: Option<String>,
}

/// GET /api/seo/analytics?type=overview|keywords|vitals
async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<Value>> {
    let kind = query.kind.as_deref().unwrap_or("overview");
    let data = match kind {
        "overview" => {
            let slugs: Vec<String> = state.store.list_posts().into_iter().map(|p| p.slug).collect();
            json!(state.analytics.overview(&slugs))
        }
        "keywords" => {
            let keywords = match query.slug.as_deref() {
                Some(slug) => {
                    let post = state.store.require_post(slug)?;
                    let entities = state.entities_for(&post);
                    search_keywords(&post, &entities, SITE_KEYWORDS)
                }
                None => site_keywords(&state),
            };
            json!(state.analytics.keyword_rankings(&keywords))
        }
        "vitals" => {
            let page = query.page.as_deref().unwrap_or("/");
            json!({
                "mock": state.analytics.core_web_vitals(page),
                "field": state.vitals.summaries(),
            })
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "Invalid type '{}'. Valid types: overview, keywords, vitals",
                other
            )));
        }
    };
    Ok(envelope_with(data, json!({ "type": kind, "mode": MOCK_MODE })))
}

/// POST /api/seo/analytics: record one field measurement from a browser.
async fn report_vital(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VitalReport>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(report) = body?;
    let metric: VitalMetric = report.metric.parse()?;
    let rating = state.vitals.record(metric, report.value)?;
    Ok(envelope_with(
        json!({
            "metric": metric,
            "value": report.value,
            "rating": rating,
            "page": report.page,
            "summary": state.vitals.summary(metric),
        }),
        json!({ "mode": "field" }),
    ))
}

/// Distinct tags across the site, in first-seen order.
fn site_keywords(state: &AppState) -> Vec<String> {
    let mut seen = BTreeSet::new();
    state
        .store
        .list_posts()
        .into_iter()
        .flat_map(|p| p.tags)
        .filter(|t| seen.insert(t.to_lowercase()))
        .take(SITE_KEYWORDS)
        .collect()
}
