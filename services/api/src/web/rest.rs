//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    AiPanel, DocumentPayload, ErrorBody, ExtractionPayload, ProcessResponse, ResetResponse,
    SessionResponse, SettingsResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use doc_simplifier_core::{
    Credential, IntakeError, MissingInput, PipelineError, UploadedDocument,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

/// The header a client uses to keep talking to the same session.
pub const SESSION_HEADER: &str = "x-session-id";

/// Every handler fails with a status code and a `{ code, message }` body.
pub type HandlerError = (StatusCode, Json<ErrorBody>);

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        process_document_handler,
        get_session_handler,
        reset_handler,
        settings_handler,
    ),
    components(
        schemas(
            ProcessResponse,
            SessionResponse,
            DocumentPayload,
            ExtractionPayload,
            AiPanel,
            ErrorBody,
            SettingsResponse,
            ResetResponse
        )
    ),
    tags(
        (name = "Document Simplifier API", description = "Upload a PDF and get a plain-English summary and key points.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::MissingInput(_) => StatusCode::BAD_REQUEST,
        PipelineError::Intake(IntakeError::UnsupportedFileType { .. }) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        PipelineError::Intake(IntakeError::FileTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        PipelineError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn pipeline_failure(err: &PipelineError) -> HandlerError {
    (status_for(err), Json(ErrorBody::from(err)))
}

fn request_failure(status: StatusCode, code: &str, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message: message.into(),
        }),
    )
}

fn multipart_failure(err: MultipartError) -> HandlerError {
    warn!("Failed to read multipart data: {}", err);
    let status = err.status();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "file_too_large"
    } else {
        "invalid_request"
    };
    request_failure(status, code, format!("Failed to read upload: {}", err.body_text()))
}

/// Reads the optional session header. A present but malformed value is rejected.
fn session_id_from(headers: &HeaderMap) -> Result<Option<Uuid>, HandlerError> {
    let Some(value) = headers.get(SESSION_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .map(Some)
        .ok_or_else(|| {
            request_failure(
                StatusCode::BAD_REQUEST,
                "invalid_session_id",
                format!("Invalid {} header", SESSION_HEADER),
            )
        })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Process a document: extract its text, then summarize it and pull out key points.
///
/// Accepts a multipart/form-data request with a `file` part and an optional
/// `api_key` part. A server-side key, when configured, takes precedence.
/// On any error the session's previous state is left untouched.
#[utoipa::path(
    post,
    path = "/documents",
    request_body(content_type = "multipart/form-data", description = "A `file` part with the PDF and an optional `api_key` part."),
    responses(
        (status = 200, description = "Document processed; generative failures are reported per panel", body = ProcessResponse),
        (status = 400, description = "Missing file or API key", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody),
        (status = 415, description = "File is not a PDF", body = ErrorBody),
        (status = 422, description = "Text could not be extracted", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("x-session-id" = Option<Uuid>, Header, description = "The session to update. A new one is created when absent.")
    )
)]
pub async fn process_document_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = session_id_from(&headers)?.unwrap_or_else(Uuid::new_v4);

    let mut upload: Option<UploadedDocument> = None;
    let mut supplied_key: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_failure)?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                upload = Some(UploadedDocument::new(file_name, data));
            }
            Some("api_key") => {
                supplied_key = Some(field.text().await.map_err(multipart_failure)?);
            }
            other => {
                warn!("Ignoring unexpected multipart field {:?}", other);
            }
        }
    }

    let credential = Credential::resolve(
        app_state.config.gemini_api_key.as_deref(),
        supplied_key.as_deref(),
    );

    match app_state.pipeline.process(upload, credential).await {
        Ok(snapshot) => {
            let response = ProcessResponse {
                session_id,
                session: SessionResponse::from(&snapshot),
            };
            app_state.sessions.replace(session_id, snapshot);
            info!("Session {} updated", session_id);
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            match &e {
                PipelineError::Internal(_) => error!("Failed to process document: {:?}", e),
                PipelineError::MissingInput(MissingInput::Credential) => {
                    warn!("Rejected upload for session {}: no API key", session_id)
                }
                _ => warn!("Rejected upload for session {}: {}", session_id, e),
            }
            Err(pipeline_failure(&e))
        }
    }
}

/// Fetch the latest state of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "The session's current state", body = SessionResponse),
        (status = 404, description = "Unknown session", body = ErrorBody)
    ),
    params(
        ("id" = Uuid, Path, description = "The session ID returned by `POST /documents`.")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    app_state
        .sessions
        .get(&session_id)
        .map(|snapshot| Json(SessionResponse::from(&snapshot)))
        .ok_or_else(|| {
            request_failure(
                StatusCode::NOT_FOUND,
                "session_not_found",
                format!("No session with id {}", session_id),
            )
        })
}

/// Clear every cached generative result and, if given, the session's state.
#[utoipa::path(
    post,
    path = "/reset",
    responses(
        (status = 200, description = "Cache cleared", body = ResetResponse),
        (status = 400, description = "Malformed session header", body = ErrorBody)
    ),
    params(
        ("x-session-id" = Option<Uuid>, Header, description = "The session to clear.")
    )
)]
pub async fn reset_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    let session_id = session_id_from(&headers)?;

    app_state.pipeline.reset();
    let session_cleared = session_id
        .map(|id| app_state.sessions.remove(&id))
        .unwrap_or(false);

    Ok(Json(ResetResponse {
        cache_cleared: true,
        session_cleared,
    }))
}

/// Report processing limits and whether an API key is configured server-side.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Current processing limits", body = SettingsResponse)
    )
)]
pub async fn settings_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &app_state.config;
    let policy = app_state.pipeline.upload_policy();
    let limits = app_state.pipeline.limits();

    Json(SettingsResponse {
        max_pages: limits.max_pages,
        max_text_chars: limits.max_text_chars,
        max_upload_bytes: policy.max_bytes,
        accepted_extensions: policy.allowed_extensions.clone(),
        cache_ttl_secs: app_state.pipeline.cache_ttl().as_secs(),
        session_ttl_secs: app_state.sessions.idle_ttl().as_secs(),
        model: config.model.clone(),
        credential_from_environment: config.gemini_api_key.is_some(),
    })
}
