//! Integration tests for the recipe REST API
//!
//! Covers every endpoint through the router, including the failure
//! paths of an unavailable store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use recipes::core::loader::{self, BUNDLED_RECIPES};
use recipes::{InMemoryStore, RecipeStore};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt as TowerServiceExt;

use crate::common::{create_test_app, read_json, read_recipe, seeded_store};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_healthz_endpoint() {
    let app = create_test_app(seeded_store());

    let response = app.oneshot(get("/api/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1_000)
        .await
        .unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_healthz_ignores_store_state() {
    let store = seeded_store();
    store.set_offline(true);
    let app = create_test_app(store);

    let response = app.oneshot(get("/api/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_recipes() {
    let app = create_test_app(seeded_store());

    let response = app.oneshot(get("/api/recipes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let body = read_json(response).await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["gazpacho", "bibimbap", "tiramisu"]);
}

#[tokio::test]
async fn test_list_recipes_empty_store() {
    let app = create_test_app(Arc::new(InMemoryStore::new()));

    let response = app.oneshot(get("/api/recipes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn test_list_recipes_store_failure_degrades_to_empty() {
    let store = seeded_store();
    store.set_offline(true);
    let app = create_test_app(store);

    let response = app.oneshot(get("/api/recipes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn test_get_recipe() {
    let app = create_test_app(seeded_store());

    let response = app.oneshot(get("/api/recipes/bibimbap")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["id"], "bibimbap");
    assert_eq!(body["title"], "Bibimbap");
    assert_eq!(body["ingredients"], json!(["rice", "gochujang", "egg"]));
    assert_eq!(body["upVotes"], 0);
    assert_eq!(body["downVotes"], 0);
}

#[tokio::test]
async fn test_get_recipe_not_found() {
    let app = create_test_app(seeded_store());

    let response = app
        .oneshot(get("/api/recipes/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await, json!({}));
}

#[tokio::test]
async fn test_get_recipe_store_failure() {
    let store = seeded_store();
    store.set_offline(true);
    let app = create_test_app(store);

    let response = app.oneshot(get("/api/recipes/gazpacho")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json(response).await;
    assert_eq!(body["status"], 500);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upvote_then_get() {
    let app = create_test_app(seeded_store());

    let response = app
        .clone()
        .oneshot(post("/api/recipes/tiramisu/up"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Vote returns the post-update state
    let updated = read_recipe(response).await;
    assert_eq!(updated.up_votes, 8);
    assert_eq!(updated.down_votes, 2);

    let response = app.oneshot(get("/api/recipes/tiramisu")).await.unwrap();
    let fetched = read_recipe(response).await;
    assert_eq!(fetched.up_votes, 8);
}

#[tokio::test]
async fn test_downvote() {
    let app = create_test_app(seeded_store());

    let response = app
        .oneshot(post("/api/recipes/gazpacho/down"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = read_recipe(response).await;
    assert_eq!(updated.down_votes, 1);
    assert_eq!(updated.up_votes, 0);
    assert_eq!(updated.extra["image"], "images/gazpacho.jpg");
}

#[tokio::test]
async fn test_vote_unknown_recipe_does_not_create() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    for uri in ["/api/recipes/ghost/up", "/api/recipes/ghost/down"] {
        let response = app.clone().oneshot(post(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await, json!({}));
    }

    assert_eq!(store.count().await.unwrap(), 3);
    assert!(store.get_recipe("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_vote_store_failure() {
    let store = seeded_store();
    store.set_offline(true);
    let app = create_test_app(store);

    let response = app
        .oneshot(post("/api/recipes/gazpacho/up"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_concurrent_upvotes_are_not_lost() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let requests: Vec<_> = (0..40)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { app.oneshot(post("/api/recipes/bibimbap/up")).await })
        })
        .collect();

    for request in requests {
        let response = request.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let recipe = store.get_recipe("bibimbap").await.unwrap().unwrap();
    assert_eq!(recipe.up_votes, 40);
}

#[tokio::test]
async fn test_vote_requires_post() {
    let app = create_test_app(seeded_store());

    let response = app.oneshot(get("/api/recipes/gazpacho/up")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_jsonp_callback_wraps_recipe() {
    let app = create_test_app(seeded_store());

    let response = app
        .oneshot(get("/api/recipes/gazpacho?callback=showRecipe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/javascript; charset=utf-8"
    );

    let body = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.starts_with("/**/ typeof showRecipe === 'function' && showRecipe({"));
    assert!(body.ends_with("});"));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = create_test_app(seeded_store());

    let request = Request::builder()
        .uri("/api/recipes")
        .header(header::ORIGIN, "http://frontend.local")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_loaded_seed_is_served_with_zero_votes() {
    let store = Arc::new(InMemoryStore::new());
    let recipes = loader::parse_seed(BUNDLED_RECIPES).unwrap();
    loader::load(store.as_ref(), recipes.clone()).await.unwrap();

    let app = create_test_app(store);

    for recipe in recipes {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/recipes/{}", recipe.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let served = read_recipe(response).await;
        assert_eq!(served.id, recipe.id);
        assert_eq!(served.extra, recipe.extra);
        assert_eq!(served.up_votes, 0);
        assert_eq!(served.down_votes, 0);
    }
}

#[tokio::test]
async fn test_list_recipes_repeated_callback_uses_first() {
    let app = create_test_app(seeded_store());

    let response = app
        .oneshot(get("/api/recipes?callback=a&callback=b"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.starts_with("/**/ typeof a === 'function' && a(["));
}

#[tokio::test]
async fn test_vote_repeated_callback_still_counts() {
    let store = seeded_store();
    let app = create_test_app(store.clone());

    let response = app
        .oneshot(post("/api/recipes/gazpacho/up?callback=x&callback=y"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let recipe = store.get_recipe("gazpacho").await.unwrap().unwrap();
    assert_eq!(recipe.up_votes, 1);
}

#[tokio::test]
async fn test_metrics_count_requests_by_route_code_and_method() {
    let app = create_test_app(seeded_store());

    for request in [
        get("/api/recipes"),
        get("/api/recipes/gazpacho"),
        get("/api/recipes/ghost"),
        post("/api/recipes/tiramisu/up"),
    ] {
        app.clone().oneshot(request).await.unwrap();
    }

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), 100_000)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();

    assert!(body.contains(
        r#"http_server_requests_total{code="200",method="GET",uri="/api/recipes"} 1"#
    ));
    assert!(body.contains(
        r#"http_server_requests_total{code="404",method="GET",uri="/api/recipes/:id"} 1"#
    ));
    assert!(body.contains(
        r#"http_server_requests_total{code="200",method="GET",uri="/api/recipes/:id"} 1"#
    ));
    assert!(body.contains(
        r#"http_server_requests_total{code="200",method="POST",uri="/api/recipes/:id/up"} 1"#
    ));
    assert!(body.contains(
        r#"http_server_request_duration_seconds_count{method="GET",uri="/api/recipes"} 1"#
    ));
    // The scrape itself is still in flight while it renders
    assert!(body.contains("http_server_requests_in_flight 1"));
}
