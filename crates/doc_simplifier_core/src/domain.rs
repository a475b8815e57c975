//! crates/doc_simplifier_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any web framework or serialization format.

use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::GenerationError;

/// Hex-encoded SHA-256 of arbitrary bytes.
pub(crate) fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}

//=========================================================================================
// Upload
//=========================================================================================

/// A file handed to the service by the user.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// SHA-256 of the raw bytes, used to recognise a re-upload of the same file.
    pub fn digest(&self) -> String {
        sha256_hex(&self.bytes)
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            filename: self.filename.clone(),
            size_bytes: self.size(),
            digest: self.digest(),
        }
    }
}

/// Metadata about the current document, kept in the session after the bytes are gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub filename: String,
    pub size_bytes: usize,
    pub digest: String,
}

//=========================================================================================
// Extraction
//=========================================================================================

/// A non-fatal notice accompanying a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The document had more pages than the ceiling; only the first `processed` were read.
    PagesTruncated { total: usize, processed: usize },
    /// A single page could not be decoded and was left out. `page` is 1-based.
    PageSkipped { page: usize, reason: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::PagesTruncated { total, processed } => write!(
                f,
                "PDF has {} pages. Processing only the first {} pages.",
                total, processed
            ),
            Advisory::PageSkipped { page, .. } => write!(f, "Could not read page {}", page),
        }
    }
}

/// Text pulled out of a document, plus how much of the document it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub text: String,
    pub total_pages: usize,
    pub pages_processed: usize,
    pub advisories: Vec<Advisory>,
}

impl ExtractionResult {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ceilings applied before any text reaches the generative step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_pages: usize,
    pub max_text_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_pages: 10,
            max_text_chars: 1_000_000,
        }
    }
}

/// What the intake step accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Lower-case extensions without the dot.
    pub allowed_extensions: Vec<String>,
    /// `None` leaves the size unchecked.
    pub max_bytes: Option<usize>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["pdf".to_string()],
            max_bytes: Some(5 * 1024 * 1024),
        }
    }
}

//=========================================================================================
// Generation
//=========================================================================================

/// The two things we ask the provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Summary,
    KeyPoints,
}

impl OutputKind {
    /// Number of leading characters of the document sent with the prompt.
    pub fn input_char_limit(self) -> usize {
        match self {
            OutputKind::Summary => 15_000,
            OutputKind::KeyPoints => 15_000,
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            OutputKind::Summary => "Please provide a 3-sentence summary in simple English:",
            OutputKind::KeyPoints => {
                "Provide exactly 5 key points as bolded bullets (**text**):"
            }
        }
    }

    /// Builds the full prompt for `text`, which must already be truncated.
    pub fn render_prompt(self, text: &str) -> String {
        format!("{}\n\n{}", self.instruction(), text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::Summary => "summary",
            OutputKind::KeyPoints => "key_points",
        }
    }
}

/// The outcome of one generative call. A successful outcome is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiResult {
    pub kind: OutputKind,
    pub outcome: Result<String, GenerationError>,
}

impl AiResult {
    pub fn success(kind: OutputKind, text: String) -> Self {
        Self {
            kind,
            outcome: Ok(text),
        }
    }

    pub fn failure(kind: OutputKind, error: GenerationError) -> Self {
        Self {
            kind,
            outcome: Err(error),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&GenerationError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

//=========================================================================================
// Credential
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Supplied,
}

/// The provider API key. Never printed, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    key: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(key: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    /// The environment value wins; otherwise the user-supplied one. Blank values count as absent.
    pub fn resolve(environment: Option<&str>, supplied: Option<&str>) -> Option<Self> {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        non_blank(environment)
            .map(|key| Self::new(key, CredentialSource::Environment))
            .or_else(|| non_blank(supplied).map(|key| Self::new(key, CredentialSource::Supplied)))
    }

    pub fn expose(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Stable identifier for cache keys, so the raw key is never stored there.
    pub fn fingerprint(&self) -> String {
        sha256_hex(self.key.as_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}
