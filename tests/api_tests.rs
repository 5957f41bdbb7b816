//! Router-level tests for the HTTP API.
//!
//! Each request runs through the real router against an in-memory
//! database via `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use taskpulse::api::{AppState, build_router};
use taskpulse::db::Database;
use tower::util::ServiceExt;

fn test_app() -> Router {
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    build_router(AppState::new(Arc::new(db)))
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-user-id", user)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_does_not_require_auth() {
    let response = test_app().oneshot(get("/api/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_user_header_is_unauthorized() {
    let response = test_app().oneshot(get("/api/tasks", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn create_and_fetch_task_round_trips() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tasks",
            "u1",
            json!({"title": "Write docs", "priority": 5, "energy_requirement": 4}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["points"], 188); // round(150 * 1.25)
    assert_eq!(created["status"], "pending");

    let task_id = created["id"].as_str().unwrap();
    let response = app
        .oneshot(get(&format!("/api/tasks/{task_id}"), Some("u1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn task_without_title_is_rejected() {
    let response = test_app()
        .oneshot(post_json("/api/tasks", "u1", json!({"title": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn foreign_tasks_are_invisible() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/tasks", "u1", json!({"title": "Mine"})))
        .await
        .unwrap();
    let created = body_json(response).await;
    let task_id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get(&format!("/api/tasks/{task_id}"), Some("u2")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn completion_reports_points_and_is_terminal() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/tasks", "u1", json!({"title": "Focus block"})))
        .await
        .unwrap();
    let created = body_json(response).await;
    let task_id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/tasks/{task_id}/complete"),
            "u1",
            json!({"current_energy_level": 3, "actual_duration": 50}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["bonus_points"], 10);
    assert_eq!(result["points_earned"], 50);
    assert_eq!(result["task"]["status"], "completed");

    let response = app
        .oneshot(post_json(
            &format!("/api/tasks/{task_id}/complete"),
            "u1",
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn suggestions_are_ranked_and_validated() {
    let app = test_app();

    for (title, priority, due) in [
        ("A", 5, Value::Null),
        ("B", 5, json!(2_000)),
        ("C", 3, json!(1_000)),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/tasks",
                "u1",
                json!({"title": title, "priority": priority, "due_date": due}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get("/api/tasks/suggestions?energy_level=3", Some("u1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "A", "C"]);
    assert_eq!(body[0]["energy_match_score"], 1.0);

    let response = app
        .oneshot(get("/api/tasks/suggestions?energy_level=7", Some("u1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn energy_log_level_is_strictly_validated() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/energy", "u1", json!({"energy_level": 9})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_FIELD_VALUE");
    assert_eq!(body["field"], "energy_level");

    let response = app
        .oneshot(post_json(
            "/api/energy",
            "u1",
            json!({"energy_level": 4, "mood_tags": ["focused"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["energy_level"], 4);
    assert_eq!(body["mood_tags"][0], "focused");
}

#[tokio::test]
async fn empty_log_history_yields_default_pattern() {
    let response = test_app()
        .oneshot(get("/api/energy/pattern", Some("u1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["average_energy"], 3.0);
    assert_eq!(body["peak_hours"], json!([]));
    assert_eq!(body["low_hours"], json!([]));
}

#[tokio::test]
async fn stats_round_trip() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/tasks", "u1", json!({"title": "One"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/stats", Some("u1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_tasks"], 1);
    assert_eq!(body["tasks_by_status"]["pending"], 1);
    assert_eq!(body["total_points"], 40);
}
