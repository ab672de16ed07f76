//! Branchtale API — HTTP surface of the adventure service.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::state::AppState;

/// Builds the application router with every route mounted.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::adventure::router())
        .nest("/sessions", routes::session::router())
        .with_state(state)
}

/// CORS policy allowing a single browser origin.
#[must_use]
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
