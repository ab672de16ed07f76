//! Read-only session inspection.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;

use branchtale_adventure::application::query_handlers::{self, SessionView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_by_token(&session_id, &*state.session_store).await?;
    Ok(Json(view))
}

/// Returns the router for session queries.
pub fn router() -> Router<AppState> {
    Router::new().route("/{session_id}", get(get_session))
}
