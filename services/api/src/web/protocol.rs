//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Core types stay free of serialization concerns; everything is converted here.

use doc_simplifier_core::{
    Advisory, AiResult, DocumentInfo, ExtractionResult, GenerationError, PipelineError,
    SessionSnapshot,
};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// The response to a successful "process document" request.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ProcessResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub session: SessionResponse,
}

/// The presentation state of a session: every region the UI renders.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct SessionResponse {
    pub stage: String,
    pub document: Option<DocumentPayload>,
    pub extraction: Option<ExtractionPayload>,
    pub summary: Option<AiPanel>,
    pub key_points: Option<AiPanel>,
    /// e.g. "Extracted 1,234 characters from 2 pages".
    pub status_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DocumentPayload {
    pub filename: String,
    pub size_bytes: usize,
    /// Hex-encoded SHA-256 of the uploaded bytes.
    pub sha256: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ExtractionPayload {
    pub text: String,
    pub char_count: usize,
    pub total_pages: usize,
    pub pages_processed: usize,
    /// Human-readable warnings, e.g. page truncation.
    pub advisories: Vec<String>,
}

/// One generative output region. Exactly one of `text` or `error` is set.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AiPanel {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// The body of every error response, and of a failed `AiPanel`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Processing limits and credential status, shown alongside the upload form.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct SettingsResponse {
    pub max_pages: usize,
    pub max_text_chars: usize,
    pub max_upload_bytes: Option<usize>,
    pub accepted_extensions: Vec<String>,
    pub cache_ttl_secs: u64,
    pub session_ttl_secs: u64,
    pub model: String,
    /// True when a key is configured server-side and the form field can be hidden.
    pub credential_from_environment: bool,
}

/// Confirms a reset.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ResetResponse {
    pub cache_cleared: bool,
    pub session_cleared: bool,
}

//=========================================================================================
// Conversions From Core Types
//=========================================================================================

impl From<&DocumentInfo> for DocumentPayload {
    fn from(info: &DocumentInfo) -> Self {
        Self {
            filename: info.filename.clone(),
            size_bytes: info.size_bytes,
            sha256: info.digest.clone(),
        }
    }
}

impl From<&ExtractionResult> for ExtractionPayload {
    fn from(extraction: &ExtractionResult) -> Self {
        Self {
            text: extraction.text.clone(),
            char_count: extraction.char_count(),
            total_pages: extraction.total_pages,
            pages_processed: extraction.pages_processed,
            advisories: extraction.advisories.iter().map(Advisory::to_string).collect(),
        }
    }
}

impl From<&GenerationError> for ErrorBody {
    fn from(err: &GenerationError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.user_message(),
        }
    }
}

impl From<&PipelineError> for ErrorBody {
    fn from(err: &PipelineError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.user_message(),
        }
    }
}

impl From<&AiResult> for AiPanel {
    fn from(result: &AiResult) -> Self {
        Self {
            kind: result.kind.as_str().to_string(),
            text: result.text().map(str::to_string),
            error: result.error().map(ErrorBody::from),
        }
    }
}

impl From<&SessionSnapshot> for SessionResponse {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            stage: snapshot.stage.as_str().to_string(),
            document: snapshot.document.as_ref().map(DocumentPayload::from),
            extraction: snapshot.extraction.as_ref().map(ExtractionPayload::from),
            summary: snapshot.summary.as_ref().map(AiPanel::from),
            key_points: snapshot.key_points.as_ref().map(AiPanel::from),
            status_message: snapshot.status_message(),
            updated_at: snapshot.updated_at,
        }
    }
}
