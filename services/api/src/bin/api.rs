//! services/api/src/bin/api.rs

use api_lib::{app::build_state, config::Config, error::ApiError, web::build_router};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    if config.gemini_api_key.is_some() {
        info!("API key loaded from the environment");
    } else {
        warn!("GEMINI_API_KEY is not set; clients must supply an API key with each upload");
    }

    // --- 2. Build the Shared AppState & Router ---
    let app_state = build_state(config.clone());
    let app = build_router(app_state);

    // --- 3. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
