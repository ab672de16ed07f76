//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_200_with_status_ok() {
    let app = common::build_test_app(Vec::<String>::new());

    let (status, json) = common::get_json(app.app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app(Vec::<String>::new());

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/nonexistent")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.app(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = common::build_test_app(Vec::<String>::new())
        .app()
        .layer(branchtale_api::cors_layer(
            axum::http::HeaderValue::from_static("http://localhost:3000"),
        ));

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/start")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_rejects_other_origins() {
    let app = common::build_test_app(Vec::<String>::new())
        .app()
        .layer(branchtale_api::cors_layer(
            axum::http::HeaderValue::from_static("http://localhost:3000"),
        ));

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/start")
        .header("origin", "http://evil.example")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}
