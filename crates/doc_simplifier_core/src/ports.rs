//! crates/doc_simplifier_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of a particular PDF library or AI provider client.

use async_trait::async_trait;

use crate::domain::Credential;
use crate::error::GenerationError;

//=========================================================================================
// Document Decoding
//=========================================================================================

/// A decoder failure. Carries the library's message for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Opens raw bytes as a paged document.
pub trait DocumentDecoder: Send + Sync {
    /// Fails when the bytes are not structurally a document this decoder understands.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn DecodedDocument>, DecodeError>;
}

/// An open document. Dropping it releases whatever the decoder holds.
pub trait DecodedDocument {
    fn page_count(&self) -> usize;

    /// Text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String, DecodeError>;
}

//=========================================================================================
// Text Generation
//=========================================================================================

/// One call to a generative-text provider.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub credential: &'a Credential,
    pub model: &'a str,
    pub prompt: &'a str,
}

/// What the provider returned when the call itself succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderReply {
    pub text: Option<String>,
    /// Set when the provider's safety filter suppressed the answer.
    pub blocked: bool,
}

impl ProviderReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            blocked: false,
        }
    }

    pub fn blocked() -> Self {
        Self {
            text: None,
            blocked: true,
        }
    }
}

/// A failed provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The adapter mapped a structured error code itself.
    Classified(GenerationError),
    /// Only free-form text is available; the core classifies it by keyword.
    Message(String),
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends a single prompt and returns the generated text.
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<ProviderReply, ProviderFailure>;
}
