//! `/api/seo`: structured data, meta tags, analysis, local SEO and sitemaps.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use trailmark_core::{BlogPost, EntityMention};
use trailmark_seo::{analyze_post, validate_schema, Sitemap};

use super::envelope_with;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seo", get(get_seo).post(post_seo))
        .route("/sitemap.xml", get(sitemap_xml))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeoAction {
    Schema,
    Meta,
    Analysis,
    Local,
    Sitemap,
}

impl SeoAction {
    const VALID: &'static str = "schema, meta, analysis, local, sitemap";

    fn as_str(self) -> &'static str {
        match self {
            SeoAction::Schema => "schema",
            SeoAction::Meta => "meta",
            SeoAction::Analysis => "analysis",
            SeoAction::Local => "local",
            SeoAction::Sitemap => "sitemap",
        }
    }
}

impl FromStr for SeoAction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schema" => Ok(SeoAction::Schema),
            "meta" => Ok(SeoAction::Meta),
            "analysis" => Ok(SeoAction::Analysis),
            "local" => Ok(SeoAction::Local),
            "sitemap" => Ok(SeoAction::Sitemap),
            other => Err(ApiError::BadRequest(format!(
                "Invalid action '{}'. Valid actions: {}",
                other,
                SeoAction::VALID
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeoQuery {
    action: Option<String>,
    slug: Option<String>,
}

/// A post named by slug, or supplied inline for a preview.
#[derive(Debug, Deserialize)]
struct PostRef {
    slug: Option<String>,
    post: Option<BlogPost>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum SeoRequest {
    Schema(PostRef),
    Meta(PostRef),
    Analysis(PostRef),
    Validate { schema: Value },
}

/// GET /api/seo?action=...&slug=...
async fn get_seo(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeoQuery>,
) -> ApiResult<Json<Value>> {
    let action: SeoAction = query
        .action
        .as_deref()
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Missing action parameter. Valid actions: {}",
                SeoAction::VALID
            ))
        })?
        .parse()?;
    let slug = query.slug.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let data = match (action, slug) {
        (SeoAction::Schema, None) => json!({ "schemas": state.schema.site_schemas() }),
        (SeoAction::Schema, Some(slug)) => {
            let (post, entities) = stored_post(&state, slug)?;
            schema_payload(&state, &post, &entities)
        }
        (SeoAction::Meta, Some(slug)) => {
            let (post, entities) = stored_post(&state, slug)?;
            meta_payload(&state, &post, &entities)
        }
        (SeoAction::Analysis, Some(slug)) => {
            let (post, entities) = stored_post(&state, slug)?;
            json!(analyze_post(&post, &entities))
        }
        (SeoAction::Meta | SeoAction::Analysis, None) => {
            return Err(ApiError::BadRequest(format!(
                "slug is required for action '{}'",
                action.as_str()
            )));
        }
        (SeoAction::Local, slug) => {
            let destination = match slug {
                Some(slug) => {
                    let (post, entities) = stored_post(&state, slug)?;
                    json!({
                        "slug": post.slug,
                        "destination": state.local.destination_schema(&post, &entities),
                        "geo": state.local.geo_meta(&post),
                    })
                }
                None => Value::Null,
            };
            json!({
                "business": state.local.business_schema(),
                "post": destination,
            })
        }
        (SeoAction::Sitemap, _) => {
            let sitemap = Sitemap::build(&state.site, &state.store.list_posts());
            json!({ "count": sitemap.entries.len(), "entries": sitemap.entries })
        }
    };

    Ok(envelope_with(data, json!({ "action": action.as_str() })))
}

/// POST /api/seo, body tagged by `action`.
async fn post_seo(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SeoRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = body?;
    let (action, data) = match request {
        SeoRequest::Schema(post_ref) => {
            let (post, entities) = resolve_post(&state, post_ref)?;
            ("schema", schema_payload(&state, &post, &entities))
        }
        SeoRequest::Meta(post_ref) => {
            let (post, entities) = resolve_post(&state, post_ref)?;
            ("meta", meta_payload(&state, &post, &entities))
        }
        SeoRequest::Analysis(post_ref) => {
            let (post, entities) = resolve_post(&state, post_ref)?;
            ("analysis", json!(analyze_post(&post, &entities)))
        }
        SeoRequest::Validate { schema } => ("validate", json!(validate_schema(&schema))),
    };
    Ok(envelope_with(data, json!({ "action": action })))
}

/// GET /api/sitemap.xml
async fn sitemap_xml(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let xml = Sitemap::build(&state.site, &state.store.list_posts()).to_xml();
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml)
}

fn stored_post(state: &AppState, slug: &str) -> ApiResult<(BlogPost, Vec<EntityMention>)> {
    let post = state.store.require_post(slug)?;
    let entities = state.entities_for(&post);
    Ok((post, entities))
}

/// Inline posts bypass the per-slug cache so previews never shadow stored posts.
fn resolve_post(state: &AppState, post_ref: PostRef) -> ApiResult<(BlogPost, Vec<EntityMention>)> {
    match post_ref {
        PostRef { post: Some(mut post), .. } => {
            if post.slug.trim().is_empty() || post.title.trim().is_empty() {
                return Err(ApiError::BadRequest(
                    "Inline post needs a slug and a title".to_string(),
                ));
            }
            post.normalize_tags();
            let entities = state.extractor.extract_uncached(&post);
            Ok((post, entities))
        }
        PostRef { slug: Some(slug), .. } => stored_post(state, slug.trim()),
        PostRef { .. } => Err(ApiError::BadRequest(
            "Provide either slug or post".to_string(),
        )),
    }
}

fn schema_payload(state: &AppState, post: &BlogPost, entities: &[EntityMention]) -> Value {
    let schemas = state.schema.graph_for_post(post, entities);
    let validation: Vec<Value> = schemas
        .iter()
        .map(|schema| {
            let result = validate_schema(schema);
            json!({
                "type": schema.get("@type"),
                "valid": result.valid,
                "errors": result.errors,
                "warnings": result.warnings,
            })
        })
        .collect();
    json!({
        "slug": post.slug,
        "schemas": schemas,
        "validation": validation,
        "entityCount": entities.len(),
    })
}

fn meta_payload(state: &AppState, post: &BlogPost, entities: &[EntityMention]) -> Value {
    let tags = state.meta.build(post, entities);
    json!({
        "slug": post.slug,
        "html": tags.to_html(),
        "tags": tags.to_map(),
        "meta": tags,
    })
}
