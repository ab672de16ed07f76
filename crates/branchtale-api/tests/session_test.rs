//! Integration tests for session inspection.

mod common;

use axum::http::StatusCode;
use branchtale_adventure::domain::scenarios::SCENARIOS;

#[tokio::test]
async fn test_get_session_returns_view_after_start() {
    let app = common::build_test_app(["You enter a clearing.\nA: fight\nB: flee"]);
    common::post_json(
        app.app(),
        "/start",
        &serde_json::json!({ "character": "knight", "sessionId": "table-1" }),
    )
    .await;

    let (status, json) = common::get_json(app.app(), "/sessions/table-1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sessionId"], "table-1");
    assert_eq!(json["character"], "knight");
    assert_eq!(json["scenario"], SCENARIOS[0]);
    assert_eq!(json["currentChoice"], 1);
    assert_eq!(json["phase"]["state"], "active");
    assert_eq!(json["phase"]["turn"], 1);
    assert_eq!(json["successCount"], 0);
    assert_eq!(json["version"], 1);
    assert_eq!(json["progress"][0]["choice"], "start");
    assert_eq!(json["progress"][0]["result"], "You enter a clearing.");
    assert_eq!(json["startedAt"], "2026-01-15T10:00:00Z");
}

#[tokio::test]
async fn test_get_unknown_session_returns_404() {
    let app = common::build_test_app(Vec::<String>::new());

    let (status, json) = common::get_json(app.app(), "/sessions/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "session_not_found");
}
