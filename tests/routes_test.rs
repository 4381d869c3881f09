mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tower::ServiceExt;

use common::{request, send};

#[tokio::test]
async fn test_root_lists_endpoints() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = send(&app, request(Method::GET, "/", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Gym Tracker");
    assert_eq!(body["endpoints"]["health"], "/api/v1/health");
}

#[tokio::test]
async fn test_health_check() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = send(&app, request(Method::GET, "/api/v1/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "API is healthy");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(!body["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let (status, body) = send(&app, request(Method::GET, "/api/v1/nothing", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["message"], "Cannot GET /api/v1/nothing");
}

#[tokio::test]
async fn test_malformed_json_is_rejected_with_envelope() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    for uri in ["/api/v1/health", "/api/v1/nothing"] {
        let response = app
            .clone()
            .oneshot(request(Method::GET, uri, None, None))
            .await
            .unwrap();
        let headers = response.headers();

        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    }
}
