//! HTTP route handlers. Every success body is
//! `{ success: true, data, metadata: { timestamp, ... } }`.

pub mod analytics;
pub mod entities;
pub mod health;
pub mod optimize;
pub mod seo;

use std::sync::Arc;

use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Largest slug list accepted by the batch endpoints.
pub const MAX_BATCH_SLUGS: usize = 50;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(seo::routes())
        .merge(analytics::routes())
        .merge(optimize::routes())
        .merge(entities::routes())
}

pub(crate) fn envelope(data: Value) -> Json<Value> {
    envelope_with(data, json!({}))
}

/// Success body with extra metadata fields next to the timestamp.
pub(crate) fn envelope_with(data: Value, extra: Value) -> Json<Value> {
    let mut metadata = serde_json::Map::new();
    metadata.insert("timestamp".into(), json!(chrono::Utc::now().to_rfc3339()));
    if let Value::Object(extra) = extra {
        metadata.extend(extra);
    }
    Json(json!({
        "success": true,
        "data": data,
        "metadata": metadata,
    }))
}

/// Read `{"slugs": [...]}`: a non-empty array of at most `max` strings.
/// Duplicates are dropped, first occurrence kept.
pub(crate) fn slugs_from_body(body: &Value, max: usize) -> Result<Vec<String>, ApiError> {
    let Some(items) = body.get("slugs").and_then(Value::as_array) else {
        return Err(ApiError::BadRequest(
            "slugs must be an array of post slugs".to_string(),
        ));
    };
    if items.is_empty() {
        return Err(ApiError::BadRequest("slugs must not be empty".to_string()));
    }
    if items.len() > max {
        return Err(ApiError::BadRequest(format!(
            "Too many slugs: {} (maximum {})",
            items.len(),
            max
        )));
    }

    let mut slugs: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Some(slug) = item.as_str() else {
            return Err(ApiError::BadRequest("slugs must be strings".to_string()));
        };
        if !slugs.iter().any(|s| s == slug) {
            slugs.push(slug.to_string());
        }
    }
    Ok(slugs)
}
