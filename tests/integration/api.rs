//! API integration tests.
//!
//! These tests drive the axum router directly over an engine backed by
//! mock providers.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use covdash::api::{build_router, create_api_state};

use crate::common::TestContext;

async fn test_router() -> Router {
    let ctx = TestContext::healthy();
    let (handle, _task) = ctx.start().await;
    build_router(create_api_state(handle))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test: Health endpoint responds with status ok.
#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router().await;

    let response = router.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

/// Test: Dashboard endpoint returns covid data, news, and schedules.
#[tokio::test]
async fn test_dashboard_endpoint() {
    let router = test_router().await;

    let response = router.oneshot(get("/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["covid"]["local"]["status"], "ready");
    assert_eq!(json["covid"]["local"]["weekly_cases"], 280);
    assert_eq!(json["covid"]["local"]["daily_rate"], 40);
    assert_eq!(json["covid"]["national"]["hospital_cases"], 500);
    assert_eq!(json["news"].as_array().unwrap().len(), 4);
    assert_eq!(json["schedule_count"], 0);
}

/// Test: Submitting with both categories creates two entries.
#[tokio::test]
async fn test_submit_schedules_for_both_categories() {
    let router = test_router().await;

    let body = json!({
        "label": "morning",
        "time": "10:30",
        "repeat": true,
        "covid": true,
        "news": true,
    });
    let response = router
        .clone()
        .oneshot(post_json("/api/schedules", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["created"][0]["title"], "covid update: morning");
    assert_eq!(json["created"][1]["title"], "news update: morning");
    assert_eq!(json["created"][0]["content"], "at 10:30");

    // Both entries show up on the dashboard.
    let response = router.oneshot(get("/api/dashboard")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["schedule_count"], 2);
}

/// Test: A submission without a category is a bad request.
#[tokio::test]
async fn test_submit_without_category_is_rejected() {
    let router = test_router().await;

    let body = json!({"label": "aimless", "time": "10:30"});
    let response = router
        .oneshot(post_json("/api/schedules", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test: An unrecognized time specification is a bad request and creates
/// nothing.
#[tokio::test]
async fn test_submit_with_invalid_time_is_rejected() {
    let router = test_router().await;

    let body = json!({"label": "bad", "time": "lunchtime", "covid": true});
    let response = router
        .clone()
        .oneshot(post_json("/api/schedules", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router.oneshot(get("/api/dashboard")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["schedule_count"], 0);
}

/// Test: Deleting a schedule removes it; unknown titles are 404.
#[tokio::test]
async fn test_delete_schedule() {
    let router = test_router().await;

    let body = json!({"label": "gone", "time": "3600", "covid": true});
    router
        .clone()
        .oneshot(post_json("/api/schedules", body))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(delete("/api/schedules/covid%20update:%20gone"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(delete("/api/schedules/covid%20update:%20gone"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router.oneshot(get("/api/dashboard")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["schedule_count"], 0);
}

/// Test: Closing an article blacklists it and refills the window.
#[tokio::test]
async fn test_close_article() {
    let router = test_router().await;

    let response = router
        .clone()
        .oneshot(delete("/api/news/second"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["blacklist"], json!(["second"]));

    let response = router.oneshot(get("/api/dashboard")).await.unwrap();
    let json = body_json(response).await;
    let titles: Vec<&str> = json["news"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "third", "fourth", "fifth"]);
}
