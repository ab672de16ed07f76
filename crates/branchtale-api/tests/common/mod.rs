//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use branchtale_adventure::domain::rules::GameRules;
use branchtale_core::clock::Clock;
use branchtale_core::rng::DeterministicRng;
use branchtale_core::session_store::SessionStore;
use branchtale_store::memory_session_store::MemorySessionStore;
use branchtale_test_support::{FixedClock, ScriptedCompletionClient, SequenceRng};
use http_body_util::BodyExt;
use tower::ServiceExt;

use branchtale_api::build_router;
use branchtale_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// A running test application: the router plus handles to its doubles.
pub struct TestApp {
    pub router: Router,
    pub completion: Arc<ScriptedCompletionClient>,
    pub store: Arc<MemorySessionStore>,
}

impl TestApp {
    /// A fresh clone of the router, for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full app router with an in-memory store, scripted completion
/// replies and the first scenario always selected. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app<I, S>(replies: I) -> TestApp
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    build_test_app_with_rules(replies, GameRules::default())
}

/// Like [`build_test_app`], with custom game rules.
pub fn build_test_app_with_rules<I, S>(replies: I, rules: GameRules) -> TestApp
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let completion = Arc::new(ScriptedCompletionClient::new(replies));
    let store = Arc::new(MemorySessionStore::new());
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SequenceRng::new(vec![0; 16])));
    let session_store: Arc<dyn SessionStore> = store.clone();
    let app_state = AppState::new(
        rules,
        fixed_clock(),
        rng,
        completion.clone(),
        session_store,
    );

    TestApp {
        router: build_router(app_state),
        completion,
        store,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_raw(app, uri, serde_json::to_vec(body).unwrap()).await
}

/// Send a POST request with an arbitrary body and return the response.
pub async fn post_raw(
    app: Router,
    uri: &str,
    body: impl Into<Body>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// A continuation reply in the JSON contract.
pub fn json_turn(scene: &str) -> String {
    serde_json::json!({
        "scene": scene,
        "options": { "A": "Press on", "B": "Turn back" }
    })
    .to_string()
}

/// A final-turn reply in the JSON contract.
pub fn json_final(scene: &str) -> String {
    serde_json::json!({ "scene": scene }).to_string()
}
