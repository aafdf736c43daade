//! Integration tests for view history and watchlist endpoints.
//!
//! Exercises the idempotent view recording path and the duplicate
//! rejection on watchlist adds through the full HTTP stack.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use trackarr::config::Config;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.database.min_connections = 1;

    let state = trackarr::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    trackarr::api::router(state).await
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    payload: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);

    let request = match payload {
        Some(payload) => builder
            .header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, body_json)
}

/// Creates a user and a content row, returning their ids.
async fn seed_user_and_content(app: &Router) -> (i64, i64) {
    let (status, body) = request(
        app,
        "POST",
        "/api/v1/users",
        Some(json!({ "account_id": "100200300", "username": "moviefan" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        app,
        "POST",
        "/api/v1/content",
        Some(json!({
            "title": "Dune",
            "content_type": "movie",
            "release_year": 2021,
            "imdb_id": "tt1160419"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let content_id = body["data"]["id"].as_i64().unwrap();

    (user_id, content_id)
}

#[tokio::test]
async fn test_record_view_and_list_history() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/history",
        Some(json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": "2024-03-01T20:00:00Z",
            "rating": 8.0,
            "duration_watched": 155
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["rating"], 8.0);
    assert_eq!(body["data"]["rewatch"], false);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["content_title"], "Dune");
    assert_eq!(entries[0]["content"]["imdb_id"], "tt1160419");
}

#[tokio::test]
async fn test_duplicate_view_report_merges_into_one_record() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/history",
        Some(json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": "2024-03-01T20:00:00Z",
            "rating": 8.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/history",
        Some(json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": "2024-03-01T20:00:00Z",
            "rating": 9.0,
            "notes": "rewatched"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"].as_i64().unwrap(), first_id);
    assert_eq!(body["data"]["rating"], 9.0);
    assert_eq!(body["data"]["notes"], "rewatched");

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}"),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_distinct_watch_dates_create_distinct_records() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    for watched_at in ["2024-03-01T20:00:00Z", "2024-03-08T20:00:00Z"] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/v1/history",
            Some(json!({
                "user_id": user_id,
                "content_id": content_id,
                "watched_at": watched_at
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}"),
        None,
    )
    .await;

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest watch first.
    assert_eq!(entries[0]["watched_at"], "2024-03-08T20:00:00+00:00");
}

#[tokio::test]
async fn test_record_view_validation() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    // Before the earliest plausible watch day.
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/history",
        Some(json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": "2019-12-31T23:59:59Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Future watch date.
    let future = chrono::Utc::now() + chrono::Duration::days(2);
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/history",
        Some(json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": future.to_rfc3339()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Rating outside 1..=10.
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/history",
        Some(json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": "2024-03-01T20:00:00Z",
            "rating": 11.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}"),
        None,
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_pagination_limits() {
    let app = spawn_app().await;
    let (user_id, _) = seed_user_and_content(&app).await;

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}?limit=0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}?limit=101"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}?limit=100&offset=10"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_stats() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    for (watched_at, rating) in [
        ("2024-03-01T20:00:00Z", Some(7.0)),
        ("2024-03-02T20:00:00Z", Some(8.5)),
        ("2024-03-03T20:00:00Z", None),
    ] {
        let mut payload = json!({
            "user_id": user_id,
            "content_id": content_id,
            "watched_at": watched_at
        });
        if let Some(rating) = rating {
            payload["rating"] = json!(rating);
        }
        let (status, _) = request(&app, "POST", "/api/v1/history", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/v1/history/user/{user_id}/stats"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_views"], 3);
    assert_eq!(body["data"]["movies_views"], 3);
    assert_eq!(body["data"]["series_views"], 0);
    assert_eq!(body["data"]["average_rating"], 7.75);
}

#[tokio::test]
async fn test_watchlist_add_and_duplicate_rejection() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    let payload = json!({ "user_id": user_id, "content_id": content_id });

    let (status, body) = request(&app, "POST", "/api/v1/watchlist", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["content_id"].as_i64().unwrap(), content_id);

    let (status, body) = request(&app, "POST", "/api/v1/watchlist", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("already in watchlist")
    );

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/v1/watchlist/user/{user_id}"),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["content_title"], "Dune");
}

#[tokio::test]
async fn test_watchlist_remove_and_clear() {
    let app = spawn_app().await;
    let (user_id, content_id) = seed_user_and_content(&app).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/v1/watchlist",
        Some(json!({ "user_id": user_id, "content_id": content_id })),
    )
    .await;
    let entry_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/v1/watchlist/{entry_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Removing again reports the miss.
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/v1/watchlist/{entry_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    request(
        &app,
        "POST",
        "/api/v1/watchlist",
        Some(json!({ "user_id": user_id, "content_id": content_id })),
    )
    .await;

    let (status, body) = request(
        &app,
        "DELETE",
        &format!("/api/v1/watchlist/user/{user_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 1);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/v1/watchlist/user/{user_id}"),
        None,
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
