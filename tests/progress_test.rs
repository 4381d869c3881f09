mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{request, send};

#[tokio::test]
async fn test_progress_requires_auth() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, _) = send(&app, request(Method::GET, "/api/v1/progress/1", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_progress_without_logged_sets() {
    let pool = common::setup_test_db();
    let (_, token) = common::create_authed_user(&pool, "lifter@example.com").await;
    let app = common::create_test_app(pool);
    let equipment_id = common::create_equipment(&app, &token, "Bench").await;

    let (status, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/v1/progress/{}", equipment_id),
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Progress retrieved successfully");
    assert_eq!(body["data"]["equipmentId"], equipment_id);
    assert_eq!(body["data"]["exercises"], json!([]));
    assert_eq!(body["data"]["maxWeight"], 0.0);
    assert_eq!(body["data"]["totalVolume"], 0.0);
    assert_eq!(body["data"]["lastWorkout"], "");
}

#[tokio::test]
async fn test_progress_aggregates_sets_across_sessions() {
    let pool = common::setup_test_db();
    let (_, token) = common::create_authed_user(&pool, "lifter@example.com").await;
    let app = common::create_test_app(pool);
    let bench = common::create_equipment(&app, &token, "Bench").await;
    let squat = common::create_equipment(&app, &token, "Squat Rack").await;

    let monday = common::create_session(&app, &token, "2024-06-03T07:30:00Z").await;
    let thursday = common::create_session(&app, &token, "2024-06-06T18:00:00Z").await;

    common::log_exercise(
        &app,
        &token,
        bench,
        monday,
        json!([{ "reps": 10, "weight": 80 }, { "reps": 8, "weight": 90 }]),
    )
    .await;
    common::log_exercise(
        &app,
        &token,
        bench,
        thursday,
        json!([{ "reps": 5, "weight": 100 }, { "reps": 3, "weight": 105 }]),
    )
    .await;
    // Heavier sets on other equipment must not leak into bench progress
    common::log_exercise(
        &app,
        &token,
        squat,
        thursday,
        json!([{ "reps": 5, "weight": 160 }]),
    )
    .await;

    let (status, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/v1/progress/{}", bench),
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["maxWeight"], 105.0);
    // 10*80 + 8*90 + 5*100 + 3*105
    assert_eq!(data["totalVolume"], 2335.0);
    assert_eq!(data["lastWorkout"], "2024-06-06T18:00:00.000Z");

    let exercises = data["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["workoutSession"]["id"], monday);
    assert_eq!(exercises[1]["workoutSession"]["id"], thursday);
    assert_eq!(exercises[1]["sets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_progress_invalid_id() {
    let pool = common::setup_test_db();
    let (_, token) = common::create_authed_user(&pool, "lifter@example.com").await;
    let app = common::create_test_app(pool);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/v1/progress/bench", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid equipment Id");
}

#[tokio::test]
async fn test_progress_for_missing_or_foreign_equipment() {
    let pool = common::setup_test_db();
    let (_, alice) = common::create_authed_user(&pool, "alice@example.com").await;
    let (_, bob) = common::create_authed_user(&pool, "bob@example.com").await;
    let app = common::create_test_app(pool);
    let equipment_id = common::create_equipment(&app, &alice, "Bench").await;

    for (uri, token) in [
        (format!("/api/v1/progress/{}", equipment_id), &bob),
        ("/api/v1/progress/9999".to_string(), &alice),
    ] {
        let (status, body) = send(&app, request(Method::GET, &uri, Some(token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Equipment not found");
    }
}
