//! Query handlers for the adventure context.

use branchtale_core::error::DomainError;
use branchtale_core::session_store::{SessionStore, SessionToken};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::game::{GamePhase, GameSession, ProgressStep};

/// Read-only view of a game session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Token the session is stored under.
    pub session_id: String,
    /// The player's character.
    pub character: String,
    /// The quest premise.
    pub scenario: String,
    /// Current choice index.
    pub current_choice: u32,
    /// Turn state, including the outcome once finished.
    pub phase: GamePhase,
    /// Scenes counted as successes.
    pub success_count: u32,
    /// Narrative history, oldest first.
    pub progress: Vec<ProgressStep>,
    /// Number of committed transitions.
    pub version: u64,
    /// When the game was started.
    pub started_at: DateTime<Utc>,
    /// When the game last changed.
    pub updated_at: DateTime<Utc>,
}

impl From<&GameSession> for SessionView {
    fn from(session: &GameSession) -> Self {
        Self {
            session_id: session.token().to_string(),
            character: session.character().to_owned(),
            scenario: session.scenario().to_owned(),
            current_choice: session.current_choice(),
            phase: session.phase(),
            success_count: session.success_count(),
            progress: session.progress().to_vec(),
            version: session.version(),
            started_at: session.started_at(),
            updated_at: session.updated_at(),
        }
    }
}

/// Retrieves a game session by its token.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank token,
/// `DomainError::SessionNotFound` if nothing is stored under it, and
/// `DomainError::Infrastructure` if the stored snapshot is unreadable.
pub async fn get_session_by_token(
    session_id: &str,
    store: &dyn SessionStore,
) -> Result<SessionView, DomainError> {
    let token = SessionToken::from_request(Some(session_id))?;
    let stored = store
        .load(&token)
        .await?
        .ok_or_else(|| DomainError::SessionNotFound(token.to_string()))?;
    let session = GameSession::from_stored(stored)?;
    Ok(SessionView::from(&session))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use branchtale_core::error::DomainError;
    use branchtale_core::session_store::SessionToken;

    use crate::application::query_handlers::get_session_by_token;
    use crate::domain::game::{GamePhase, GameSession, StepChoice};
    use crate::domain::parser::ParsedScene;
    use branchtale_test_support::{FailingSessionStore, FixedClock, RecordingSessionStore};

    #[tokio::test]
    async fn test_get_session_by_token_returns_view_with_state() {
        // Arrange
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let token = SessionToken::from_request(Some("run-1")).unwrap();
        let session = GameSession::begin(
            token,
            "bard".to_owned(),
            "Turn a princess back from a frog.".to_owned(),
            &ParsedScene {
                scene: "A lily pad drifts.".to_owned(),
                options: None,
            },
            &clock,
        );
        let store = RecordingSessionStore::with_sessions(vec![session.to_stored().unwrap()]);

        // Act
        let view = get_session_by_token("run-1", &store).await.unwrap();

        // Assert
        assert_eq!(view.session_id, "run-1");
        assert_eq!(view.character, "bard");
        assert_eq!(view.current_choice, 1);
        assert_eq!(view.phase, GamePhase::Active { turn: 1 });
        assert_eq!(view.progress[0].choice, StepChoice::Start);
        assert_eq!(view.version, 1);
        assert_eq!(view.started_at, clock.0);
    }

    #[tokio::test]
    async fn test_get_session_by_token_returns_not_found_when_absent() {
        // Arrange
        let store = RecordingSessionStore::new();

        // Act
        let result = get_session_by_token("nobody", &store).await;

        // Assert
        match result.unwrap_err() {
            DomainError::SessionNotFound(token) => assert_eq!(token, "nobody"),
            other => panic!("expected SessionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_session_by_token_surfaces_store_failure() {
        let result = get_session_by_token("run-1", &FailingSessionStore).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
