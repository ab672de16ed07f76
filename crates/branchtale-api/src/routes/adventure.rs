//! Routes for starting and playing an adventure.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{Span, field, info, instrument};
use uuid::Uuid;

use branchtale_adventure::application::command_handlers::{self, AdventureTurn};
use branchtale_adventure::domain::commands;
use branchtale_core::session_store::DEFAULT_SESSION_TOKEN;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /start.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    /// The player's character.
    #[serde(default)]
    pub character: Option<String>,
    /// Session to start; the default session when absent.
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

/// Request body for POST /adventure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureRequest {
    /// `"A"` or `"B"`.
    #[serde(default)]
    pub choice: Option<String>,
    /// Session to advance; the default session when absent.
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

/// Response body for POST /start.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    /// Token of the started session.
    pub session_id: String,
    /// Introductory line naming the character and quest.
    pub message: String,
    /// Opening scene.
    pub scene: String,
    /// Text of option A.
    pub option_a: String,
    /// Text of option B.
    pub option_b: String,
}

/// Response body for POST /adventure.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AdventureResponse {
    /// The game continues.
    #[serde(rename_all = "camelCase")]
    Continue {
        /// Token of the session.
        session_id: String,
        /// The new choice index.
        turn: u32,
        /// Next scene.
        scene: String,
        /// Text of option A.
        option_a: String,
        /// Text of option B.
        option_b: String,
    },
    /// The game is over.
    #[serde(rename_all = "camelCase")]
    Finished {
        /// Token of the session.
        session_id: String,
        /// The final choice index.
        turn: u32,
        /// Closing scene.
        scene: String,
        /// Win or lose message.
        final_message: String,
        /// `"win"` or `"lose"`.
        outcome: &'static str,
    },
}

impl From<AdventureTurn> for AdventureResponse {
    fn from(turn: AdventureTurn) -> Self {
        match turn {
            AdventureTurn::Continue {
                session_id,
                turn,
                scene,
                options,
            } => Self::Continue {
                session_id: session_id.to_string(),
                turn,
                scene,
                option_a: options.a,
                option_b: options.b,
            },
            AdventureTurn::Finished {
                session_id,
                turn,
                scene,
                outcome,
            } => Self::Finished {
                session_id: session_id.to_string(),
                turn,
                scene,
                final_message: outcome.final_message().to_owned(),
                outcome: outcome.as_str(),
            },
        }
    }
}

/// POST /start
#[instrument(skip_all, fields(session_id = field::Empty))]
async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, ApiError> {
    let Json(request) = payload?;
    Span::current().record(
        "session_id",
        request.session_id.as_deref().unwrap_or(DEFAULT_SESSION_TOKEN),
    );
    let command = commands::StartAdventure {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        character: request.character,
    };

    info!(correlation_id = %command.correlation_id, "handling start_adventure command");

    let started = command_handlers::handle_start_adventure(
        &command,
        &state.rules,
        state.clock.as_ref(),
        &*state.rng,
        &*state.completion,
        &*state.session_store,
    )
    .await?;

    Ok(Json(StartResponse {
        message: started.message(),
        session_id: started.session_id.to_string(),
        scene: started.scene,
        option_a: started.options.a,
        option_b: started.options.b,
    }))
}

/// POST /adventure
#[instrument(skip_all, fields(session_id = field::Empty))]
async fn adventure(
    State(state): State<AppState>,
    payload: Result<Json<AdventureRequest>, JsonRejection>,
) -> Result<Json<AdventureResponse>, ApiError> {
    let Json(request) = payload?;
    Span::current().record(
        "session_id",
        request.session_id.as_deref().unwrap_or(DEFAULT_SESSION_TOKEN),
    );
    let command = commands::ChooseOption {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        choice: request.choice,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_option command");

    let turn = command_handlers::handle_choose_option(
        &command,
        &state.rules,
        state.clock.as_ref(),
        &*state.completion,
        &*state.session_store,
    )
    .await?;

    Ok(Json(AdventureResponse::from(turn)))
}

/// Returns the router for the adventure endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start))
        .route("/adventure", post(adventure))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use branchtale_adventure::domain::rules::GameRules;
    use branchtale_core::clock::Clock;
    use branchtale_core::completion::CompletionClient;
    use branchtale_core::rng::DeterministicRng;
    use branchtale_core::session_store::SessionStore;
    use branchtale_test_support::{
        FailingCompletionClient, FailingSessionStore, FixedClock, MockRng,
        RecordingSessionStore, ScriptedCompletionClient,
    };
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const OPENING: &str = "You enter a clearing.\nA: fight\nB: flee";

    fn app_state_with(
        completion: Arc<dyn CompletionClient>,
        session_store: Arc<dyn SessionStore>,
    ) -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc::now()));
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(GameRules::default(), clock, rng, completion, session_store)
    }

    async fn send_post(app: Router, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    fn json_body(value: &Value) -> Body {
        Body::from(serde_json::to_vec(value).unwrap())
    }

    #[tokio::test]
    async fn test_start_returns_200_with_scene_and_options() {
        // Arrange
        let state = app_state_with(
            Arc::new(ScriptedCompletionClient::new([OPENING])),
            Arc::new(RecordingSessionStore::new()),
        );
        let app = router().with_state(state);

        // Act
        let (status, json) = send_post(
            app,
            "/start",
            json_body(&serde_json::json!({ "character": "knight" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sessionId"], "default");
        assert_eq!(json["scene"], "You enter a clearing.");
        assert_eq!(json["optionA"], "fight");
        assert_eq!(json["optionB"], "flee");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("You are a knight. Your adventure: ")
        );
    }

    #[tokio::test]
    async fn test_start_accepts_snake_case_session_id() {
        let state = app_state_with(
            Arc::new(ScriptedCompletionClient::new([OPENING])),
            Arc::new(RecordingSessionStore::new()),
        );
        let app = router().with_state(state);

        let (status, json) = send_post(
            app,
            "/start",
            json_body(&serde_json::json!({ "character": "bard", "session_id": "table-7" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sessionId"], "table-7");
    }

    #[tokio::test]
    async fn test_start_returns_400_for_missing_character() {
        let state = app_state_with(
            Arc::new(ScriptedCompletionClient::new([OPENING])),
            Arc::new(RecordingSessionStore::new()),
        );
        let app = router().with_state(state);

        let (status, json) = send_post(app, "/start", Body::from("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_start_returns_400_for_malformed_json() {
        let state = app_state_with(
            Arc::new(ScriptedCompletionClient::new([OPENING])),
            Arc::new(RecordingSessionStore::new()),
        );
        let app = router().with_state(state);

        let (status, json) = send_post(app, "/start", Body::from("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_start_returns_500_when_completion_fails() {
        let state = app_state_with(
            Arc::new(FailingCompletionClient),
            Arc::new(RecordingSessionStore::new()),
        );
        let app = router().with_state(state);

        let (status, json) = send_post(
            app,
            "/start",
            json_body(&serde_json::json!({ "character": "knight" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "upstream_error");
        assert_eq!(json["message"], "failed to generate the next scene");
    }

    #[tokio::test]
    async fn test_start_returns_500_when_store_fails() {
        let state = app_state_with(
            Arc::new(ScriptedCompletionClient::new([OPENING])),
            Arc::new(FailingSessionStore),
        );
        let app = router().with_state(state);

        let (status, json) = send_post(
            app,
            "/start",
            json_body(&serde_json::json!({ "character": "knight" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_adventure_before_start_returns_400_state_error() {
        let state = app_state_with(
            Arc::new(ScriptedCompletionClient::new(Vec::<String>::new())),
            Arc::new(RecordingSessionStore::new()),
        );
        let app = router().with_state(state);

        let (status, json) = send_post(
            app,
            "/adventure",
            json_body(&serde_json::json!({ "choice": "A" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "state_error");
    }

    #[tokio::test]
    async fn test_adventure_returns_next_scene() {
        let completion = Arc::new(ScriptedCompletionClient::new([
            OPENING,
            "The wolf backs away.\nA: follow it\nB: make camp",
        ]));
        let state = app_state_with(completion, Arc::new(RecordingSessionStore::new()));

        let (status, _) = send_post(
            router().with_state(state.clone()),
            "/start",
            json_body(&serde_json::json!({ "character": "knight" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send_post(
            router().with_state(state),
            "/adventure",
            json_body(&serde_json::json!({ "choice": "A" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["turn"], 2);
        assert_eq!(json["scene"], "The wolf backs away.");
        assert_eq!(json["optionA"], "follow it");
        assert_eq!(json["optionB"], "make camp");
        assert!(json.get("outcome").is_none());
    }

    #[tokio::test]
    async fn test_adventure_returns_400_for_invalid_choice() {
        let completion = Arc::new(ScriptedCompletionClient::new([OPENING]));
        let state = app_state_with(completion, Arc::new(RecordingSessionStore::new()));

        send_post(
            router().with_state(state.clone()),
            "/start",
            json_body(&serde_json::json!({ "character": "knight" })),
        )
        .await;

        let (status, json) = send_post(
            router().with_state(state),
            "/adventure",
            json_body(&serde_json::json!({ "choice": "C" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }
}
