use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use http_body_util::BodyExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tunedex::config::Config;

/// Stand-in for the upstream catalog: serves the scripted responses one per
/// request, 500 once the script runs out.
async fn spawn_catalog_stub(responses: Vec<(StatusCode, String)>) -> String {
    let script = Arc::new(Mutex::new(VecDeque::from(responses)));

    let app = Router::new().route(
        "/search",
        get(move || {
            let script = script.clone();
            async move {
                let next = script.lock().unwrap().pop_front();
                next.unwrap_or((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "stub script exhausted".to_string(),
                ))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind catalog stub");
    let addr = listener.local_addr().expect("No local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Catalog stub died");
    });

    format!("http://{}/search", addr)
}

async fn spawn_app(catalog_url: &str, strict_errors: bool) -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A pooled in-memory SQLite gives every connection its own database;
    // pin the pool to a single connection so all queries see the same one.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.catalog.base_url = catalog_url.to_string();
    config.catalog.strict_errors = strict_errors;

    let state = tunedex::api::create_app_state(config, None)
        .await
        .expect("Failed to create app state");
    tunedex::api::router(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    (status, json)
}

fn podcast_body(artist: &str) -> String {
    serde_json::json!({
        "resultCount": 1,
        "results": [{
            "trackId": 1,
            "kind": "podcast",
            "artistName": artist,
            "collectionName": "B",
            "collectionViewUrl": "http://x",
            "artworkUrl600": "http://img"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_missing_search_word_is_rejected() {
    let catalog = spawn_catalog_stub(vec![]).await;
    let app = spawn_app(&catalog, false).await;

    for uri in ["/search", "/search/", "/search/%20"] {
        let (status, body) = get_json(&app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": "searchWord parameter is required"
            }),
            "uri: {uri}"
        );
    }
}

#[tokio::test]
async fn test_search_returns_stored_records() {
    let catalog = spawn_catalog_stub(vec![(StatusCode::OK, podcast_body("A"))]).await;
    let app = spawn_app(&catalog, false).await;

    let (status, body) = get_json(&app, "/search/test").await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().expect("expected a bare array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["kind"], "podcast");
    assert_eq!(records[0]["artistName"], "A");
    assert_eq!(records[0]["collectionName"], "B");
    assert_eq!(records[0]["collectionViewUrl"], "http://x");
    assert_eq!(records[0]["image"], "http://img");
    assert!(records[0]["searchDate"].is_string());
}

#[tokio::test]
async fn test_track_fields_fall_back_for_singles() {
    let body = serde_json::json!({
        "resultCount": 1,
        "results": [{
            "trackId": 9,
            "kind": "song",
            "artistName": "A",
            "trackName": "Single",
            "trackViewUrl": "http://view/track",
            "artworkUrl100": "http://img/100"
        }]
    })
    .to_string();

    let catalog = spawn_catalog_stub(vec![(StatusCode::OK, body)]).await;
    let app = spawn_app(&catalog, false).await;

    let (status, body) = get_json(&app, "/search/single").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["collectionName"], "Single");
    assert_eq!(body[0]["collectionViewUrl"], "http://view/track");
    assert_eq!(body[0]["image"], "http://img/100");
}

#[tokio::test]
async fn test_upstream_failure_is_swallowed_by_default() {
    let catalog =
        spawn_catalog_stub(vec![(StatusCode::SERVICE_UNAVAILABLE, String::new())]).await;
    let app = spawn_app(&catalog, false).await;

    let (status, body) = get_json(&app, "/search/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_malformed_upstream_body_is_swallowed_by_default() {
    let catalog =
        spawn_catalog_stub(vec![(StatusCode::OK, r#"{"resultCount":0}"#.to_string())]).await;
    let app = spawn_app(&catalog, false).await;

    let (status, body) = get_json(&app, "/search/test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_upstream_failure_is_surfaced_in_strict_mode() {
    let catalog =
        spawn_catalog_stub(vec![(StatusCode::SERVICE_UNAVAILABLE, String::new())]).await;
    let app = spawn_app(&catalog, true).await;

    let (status, body) = get_json(&app, "/search/test").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "catalog service is unavailable");
}

#[tokio::test]
async fn test_repeat_search_upserts_instead_of_duplicating() {
    let catalog = spawn_catalog_stub(vec![
        (StatusCode::OK, podcast_body("A")),
        (StatusCode::OK, podcast_body("New Name")),
    ])
    .await;
    let app = spawn_app(&catalog, false).await;

    let (_, first) = get_json(&app, "/search/test").await;
    let (_, second) = get_json(&app, "/search/test").await;

    assert_eq!(first[0]["id"], second[0]["id"]);
    assert_eq!(second[0]["artistName"], "New Name");

    let (status, body) = get_json(&app, "/system/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["storedRecords"].as_u64(), Some(1));
}

#[tokio::test]
async fn test_repeat_search_is_idempotent_apart_from_search_date() {
    let catalog = spawn_catalog_stub(vec![
        (StatusCode::OK, podcast_body("A")),
        (StatusCode::OK, podcast_body("A")),
    ])
    .await;
    let app = spawn_app(&catalog, false).await;

    let (_, first) = get_json(&app, "/search/test").await;
    let (_, second) = get_json(&app, "/search/test").await;

    for field in [
        "id",
        "kind",
        "artistName",
        "collectionName",
        "collectionViewUrl",
        "image",
    ] {
        assert_eq!(first[0][field], second[0][field], "field: {field}");
    }

    // The upsert is a refresh, not a no-op: the stamp must move forward.
    assert!(second[0]["searchDate"].is_string());
    assert_ne!(first[0]["searchDate"], second[0]["searchDate"]);
}

#[tokio::test]
async fn test_system_status() {
    let catalog = spawn_catalog_stub(vec![]).await;
    let app = spawn_app(&catalog, false).await;

    let (status, body) = get_json(&app, "/system/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["version"].is_string());
    assert_eq!(body["data"]["storedRecords"].as_u64(), Some(0));
    assert_eq!(body["data"]["dbReady"], true);
}
