//! services/api/src/web/router.rs
//!
//! Assembles the complete Axum application: API routes, middleware layers,
//! and the Swagger UI.

use crate::web::rest::{
    get_session_handler, process_document_handler, reset_handler, settings_handler, ApiDoc,
    SESSION_HEADER,
};
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Transport-level ceiling. The upload policy enforces the tighter, user-facing limit.
const MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

/// Builds the router for the given state.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/documents", post(process_document_handler))
        .route("/sessions/{id}", get(get_session_handler))
        .route("/reset", post(reset_handler))
        .route("/settings", get(settings_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(cors_layer(&app_state.config.allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(SESSION_HEADER),
        ]);

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!(
                "ALLOWED_ORIGIN '{}' is not a valid header value; cross-origin requests are disabled",
                allowed_origin
            );
            layer
        }
    }
}
