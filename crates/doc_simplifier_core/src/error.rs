//! crates/doc_simplifier_core/src/error.rs
//!
//! The failure taxonomy shared by every pipeline step.
//!
//! Each error carries a stable `code()` used on the wire and a short,
//! non-technical `user_message()`. Only `UnknownProviderError` surfaces the
//! underlying provider message.

/// Which required input was not supplied before processing was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    Document,
    Credential,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("File type not accepted: {filename}")]
    UnsupportedFileType { filename: String },
    #[error("File is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Document could not be decoded: {0}")]
    CorruptInput(String),
    #[error("Document contains no extractable text")]
    NoExtractableText,
    #[error("Extracted text has {chars} characters, the limit is {limit}")]
    TextTooLarge { chars: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid API key")]
    InvalidCredential,
    #[error("API quota exceeded")]
    QuotaExceeded,
    #[error("Network error while contacting the provider")]
    NetworkError,
    #[error("Response blocked by the provider's safety filter")]
    ContentBlocked,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Provider error: {0}")]
    UnknownProviderError(String),
}

/// Anything that aborts processing of an upload before the generative step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Missing required input: {0:?}")]
    MissingInput(MissingInput),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl IntakeError {
    pub fn code(&self) -> &'static str {
        match self {
            IntakeError::UnsupportedFileType { .. } => "unsupported_file_type",
            IntakeError::FileTooLarge { .. } => "file_too_large",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            IntakeError::UnsupportedFileType { .. } => "Only PDF files are accepted.".to_string(),
            IntakeError::FileTooLarge { limit, .. } => format!(
                "File is too large. The maximum size is {:.1} MB.",
                *limit as f64 / (1024.0 * 1024.0)
            ),
        }
    }
}

impl ExtractionError {
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::CorruptInput(_) => "corrupt_input",
            ExtractionError::NoExtractableText => "no_extractable_text",
            ExtractionError::TextTooLarge { .. } => "text_too_large",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::CorruptInput(_) => {
                "The file could not be read as a PDF.".to_string()
            }
            ExtractionError::NoExtractableText => {
                "PDF appears empty or contains only images.".to_string()
            }
            ExtractionError::TextTooLarge { .. } => {
                "Text too large. Please use a smaller document.".to_string()
            }
        }
    }
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidCredential => "invalid_credential",
            GenerationError::QuotaExceeded => "quota_exceeded",
            GenerationError::NetworkError => "network_error",
            GenerationError::ContentBlocked => "content_blocked",
            GenerationError::EmptyResponse => "empty_response",
            GenerationError::UnknownProviderError(_) => "unknown_provider_error",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            GenerationError::InvalidCredential => "Invalid API key".to_string(),
            GenerationError::QuotaExceeded => "API quota exceeded".to_string(),
            GenerationError::NetworkError => {
                "Could not reach the AI service. Check your connection.".to_string()
            }
            GenerationError::ContentBlocked => {
                "The AI service declined to answer for this document.".to_string()
            }
            GenerationError::EmptyResponse => "Empty response".to_string(),
            GenerationError::UnknownProviderError(message) => format!("Error: {}", message),
        }
    }
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::MissingInput(_) => "missing_input",
            PipelineError::Intake(e) => e.code(),
            PipelineError::Extraction(e) => e.code(),
            PipelineError::Internal(_) => "internal",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            PipelineError::MissingInput(MissingInput::Document) => {
                "Missing required inputs! Upload a PDF first.".to_string()
            }
            PipelineError::MissingInput(MissingInput::Credential) => {
                "Missing required inputs! Enter an API key.".to_string()
            }
            PipelineError::Intake(e) => e.user_message(),
            PipelineError::Extraction(e) => e.user_message(),
            PipelineError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}
