//! Branchtale API server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use branchtale_api::config::ServerConfig;
use branchtale_api::state::AppState;
use branchtale_api::{build_router, cors_layer};
use branchtale_completion::OpenAiCompletionClient;
use branchtale_core::clock::{Clock, SystemClock};
use branchtale_core::rng::{DeterministicRng, SystemRng};
use branchtale_store::memory_session_store::MemorySessionStore;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Branchtale API server");

    let config = ServerConfig::from_env()?;
    tracing::info!(
        model = %config.completion.model,
        max_choices = config.rules.max_choices(),
        success_threshold = config.rules.success_threshold(),
        "configuration loaded"
    );

    let completion = OpenAiCompletionClient::new(config.completion.clone())?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(SystemRng::new()));
    let app_state = AppState::new(
        config.rules.clone(),
        clock,
        rng,
        Arc::new(completion),
        Arc::new(MemorySessionStore::new()),
    );

    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.cors_origin.clone()));

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
