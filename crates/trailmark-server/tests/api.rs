//! HTTP API tests: status codes and response shapes, driven through the
//! router in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use trailmark_core::{BlogPost, ServerConfig, SiteConfig};
use trailmark_server::{build_router, AppState};
use trailmark_store::ContentStore;

fn post(slug: &str, title: &str, content: &str, location: Option<&str>) -> BlogPost {
    BlogPost {
        slug: slug.into(),
        title: title.into(),
        excerpt: format!("{} excerpt.", title),
        content: content.into(),
        tags: vec!["Thailand".into()],
        location: location.map(String::from),
        date: "2024-03-01".into(),
        ..Default::default()
    }
}

fn app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig::from_env(dir.path()).unwrap();
    let store = ContentStore::from_posts(vec![
        post(
            "bangkok-food",
            "Street Food in Bangkok",
            "We ate pad thai and tom yum in Bangkok, then rode a tuk tuk to the night market.",
            Some("Bangkok"),
        ),
        post(
            "chiang-mai-temples",
            "Temples of Chiang Mai",
            "## Is Doi Suthep worth it?\n\nYes, go early.\n\nChiang Mai and Bangkok both have great temples.",
            Some("Chiang Mai"),
        ),
        post("untitled", " ", "Nothing here.", None),
    ]);
    let state = AppState::new(config, SiteConfig::default(), store);
    (build_router(Arc::new(state)), dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["content"]["totalPosts"], 3);
    assert!(body["metadata"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_seo_invalid_or_missing_action() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/seo?action=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("bogus"));

    let (status, _) = get(&app, "/api/seo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/seo?action=meta").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_seo_unknown_slug_is_404() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/seo?action=schema&slug=nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_seo_schema_for_post() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/seo?action=schema&slug=chiang-mai-temples").await;
    assert_eq!(status, StatusCode::OK);
    let schemas = body["data"]["schemas"].as_array().unwrap();
    assert_eq!(schemas[0]["@type"], "BlogPosting");
    assert!(schemas.iter().any(|s| s["@type"] == "FAQPage"));
    assert!(body["data"]["validation"]
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v["valid"] == true));
    assert_eq!(body["metadata"]["action"], "schema");

    let (status, body) = get(&app, "/api/seo?action=schema").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["schemas"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_seo_meta_and_analysis() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/seo?action=meta&slug=bangkok-food").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["tags"]["og:url"],
        "https://example.com/blog/bangkok-food"
    );
    assert_eq!(body["data"]["tags"]["geo.placename"], "Bangkok");

    let (status, body) = get(&app, "/api/seo?action=analysis&slug=bangkok-food").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["score"].as_u64().unwrap() <= 100);
    assert!(body["data"]["wordCount"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_seo_local_and_sitemap() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/seo?action=local&slug=bangkok-food").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["business"].is_null());
    assert_eq!(body["data"]["post"]["destination"]["@type"], "TouristDestination");

    let (status, body) = get(&app, "/api/seo?action=sitemap").await;
    assert_eq!(status, StatusCode::OK);
    // home, blog, three posts, one tag
    assert_eq!(body["data"]["count"], 6);

    let response = app
        .clone()
        .oneshot(Request::get("/api/sitemap.xml").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/xml"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let xml = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(xml.contains("<loc>https://example.com/blog/bangkok-food</loc>"));
}

#[tokio::test]
async fn test_seo_post_actions() {
    let (app, _dir) = app();
    let (status, body) = post_json(
        &app,
        "/api/seo",
        json!({ "action": "validate", "schema": { "@type": "Person" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["valid"], false);

    let inline = json!({
        "action": "meta",
        "post": {
            "slug": "draft",
            "title": "Draft Post About Krabi",
            "content": "Kayaking in Krabi.",
            "date": "2024-04-01"
        }
    });
    let (status, body) = post_json(&app, "/api/seo", inline).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "draft");

    let (status, _) = post_json(&app, "/api/seo", json!({ "action": "schema" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/api/seo", json!({ "action": "explode" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        post_json(&app, "/api/seo", json!({ "action": "analysis", "slug": "missing" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seo_inline_post_tags_are_deduplicated() {
    let (app, _dir) = app();
    let inline = json!({
        "action": "meta",
        "post": {
            "slug": "draft",
            "title": "Draft Post About Krabi",
            "content": "Kayaking in Krabi.",
            "date": "2024-04-01",
            "tags": ["Krabi", "krabi", "#Krabi", "Kayaking"]
        }
    });
    let (status, body) = post_json(&app, "/api/seo", inline).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tags"]["article:tag"], "Krabi, Kayaking");
}

#[tokio::test]
async fn test_optimize_rejects_bad_slug_lists() {
    let (app, _dir) = app();
    let too_many: Vec<String> = (0..51).map(|i| format!("post-{}", i)).collect();
    let (status, body) =
        post_json(&app, "/api/seo/phase9/optimize", json!({ "slugs": too_many })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = post_json(&app, "/api/seo/phase9/optimize", json!({ "slugs": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        post_json(&app, "/api/seo/phase9/optimize", json!({ "slugs": "bangkok-food" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/api/seo/phase9/optimize", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_optimize_skips_unknown_and_records_failures() {
    let (app, _dir) = app();
    let (status, body) = post_json(
        &app,
        "/api/seo/phase9/optimize",
        json!({ "slugs": ["bangkok-food", "does-not-exist", "untitled"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["slug"], "bangkok-food");
    assert_eq!(results[0]["success"], true);
    assert!(results[0]["optimizedTitle"].is_string());
    assert_eq!(results[1]["slug"], "untitled");
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].is_string());
    assert_eq!(body["metadata"]["skipped"], json!(["does-not-exist"]));

    let (status, body) = get(&app, "/api/seo/phase9/results").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["totalRuns"], 1);
    assert_eq!(body["data"][0]["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_optimize_repeated_slug_yields_one_entry() {
    let (app, _dir) = app();
    let (status, body) = post_json(
        &app,
        "/api/seo/phase9/optimize",
        json!({ "slugs": ["bangkok-food", "bangkok-food"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["metadata"]["requested"], 1);
}

#[tokio::test]
async fn test_optimize_fifty_slugs_accepted() {
    let (app, _dir) = app();
    let mut slugs: Vec<String> = (0..49).map(|i| format!("missing-{}", i)).collect();
    slugs.push("bangkok-food".into());
    let (status, body) =
        post_json(&app, "/api/seo/phase9/optimize", json!({ "slugs": slugs })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_entities_routes() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/entities/bangkok-food").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]["entities"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert!(names.contains(&"Bangkok"));
    assert!(names.contains(&"Pad Thai"));

    let (status, _) = get(&app, "/api/entities/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post_json(
        &app,
        "/api/entities/batch",
        json!({ "slugs": ["bangkok-food", "chiang-mai-temples", "nope"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["bangkok-food"].is_array());
    assert_eq!(body["metadata"]["processed"], 2);
    assert_eq!(body["metadata"]["skipped"], json!(["nope"]));

    let (status, body) = post_json(&app, "/api/entities/cache/clear", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["cleared"].as_u64().unwrap() >= 2);
}

#[tokio::test]
async fn test_knowledge_graph() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/knowledge-graph?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    let entities = body["data"]["entities"].as_array().unwrap();
    assert!(!entities.is_empty());
    assert!(entities.len() <= 10);
    // Bangkok appears in two posts and tops the frequency ranking.
    assert_eq!(entities[0]["id"], "Place:Bangkok");
    assert_eq!(entities[0]["frequency"], 2);
    assert!(body["metadata"]["stats"]["nodeCount"].as_u64().unwrap() > 0);

    let (_, health) = get(&app, "/api/health").await;
    assert!(health["data"]["knowledgeGraph"]["nodeCount"].is_number());
}

#[tokio::test]
async fn test_analytics() {
    let (app, _dir) = app();
    let (status, body) = get(&app, "/api/seo/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mode"], "mock");
    assert_eq!(body["data"]["totalPages"], 3);

    let (status, body) = get(&app, "/api/seo/analytics?type=keywords&slug=bangkok-food").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["data"]["rankings"].as_array().unwrap().is_empty());

    let (status, _) = get(&app, "/api/seo/analytics?type=traffic").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app,
        "/api/seo/analytics",
        json!({ "metric": "LCP", "value": 3100.0, "page": "/blog/bangkok-food" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], "needs-improvement");
    assert_eq!(body["data"]["summary"]["count"], 1);

    let (status, _) =
        post_json(&app, "/api/seo/analytics", json!({ "metric": "FID", "value": 10.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/api/seo/analytics?type=vitals").await;
    let field = body["data"]["field"].as_array().unwrap();
    assert!(field.iter().any(|s| s["metric"] == "LCP" && s["count"] == 1));
}
