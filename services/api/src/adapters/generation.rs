//! services/api/src/adapters/generation.rs
//!
//! This module contains the adapter for the generative-text provider.
//! It implements the `TextGenerationService` port from the `core` crate by
//! talking to an OpenAI-compatible chat endpoint (Gemini exposes one).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, FinishReason,
    },
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use doc_simplifier_core::{
    ports::{GenerationRequest, ProviderFailure, ProviderReply, TextGenerationService},
    GenerationError,
};
use std::time::Duration;
use tracing::{debug, error};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
///
/// The credential arrives with each request, so a client is configured per call.
#[derive(Clone, Debug)]
pub struct OpenAiCompatGenerationAdapter {
    api_base: String,
}

impl OpenAiCompatGenerationAdapter {
    /// Creates a new `OpenAiCompatGenerationAdapter` for the given base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    fn client(&self, api_key: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base);
        Client::with_config(config).with_backoff(single_attempt())
    }
}

/// A backoff that gives up after the first attempt. Failures go straight back
/// to the user; the client's default would retry 429s and 5xx for minutes.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiCompatGenerationAdapter {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<ProviderReply, ProviderFailure> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt)
            .build()
            .map_err(map_openai_error)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(request.model)
            .messages(vec![message.into()])
            .n(1)
            .build()
            .map_err(map_openai_error)?;

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client(request.credential.expose())
            .chat()
            .create(chat_request)
            .await
            .map_err(map_openai_error)?;

        let Some(choice) = response.choices.into_iter().next() else {
            debug!("Provider returned no choices");
            return Ok(ProviderReply::default());
        };

        if matches!(choice.finish_reason, Some(FinishReason::ContentFilter)) {
            return Ok(ProviderReply::blocked());
        }

        Ok(ProviderReply {
            text: choice.message.content,
            blocked: false,
        })
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Prefers the structured error code. Anything else is handed to the core as a raw
/// message for keyword classification.
fn map_openai_error(err: OpenAIError) -> ProviderFailure {
    match err {
        OpenAIError::Reqwest(e) => {
            error!("Transport error talking to provider: {}", e);
            ProviderFailure::Classified(GenerationError::NetworkError)
        }
        OpenAIError::ApiError(api) => {
            error!("Provider rejected request: {}", api.message);
            match classify_error_code(api.code.as_deref(), api.r#type.as_deref()) {
                Some(classified) => ProviderFailure::Classified(classified),
                None => ProviderFailure::Message(api.message),
            }
        }
        other => {
            error!("Provider call failed: {}", other);
            ProviderFailure::Message(other.to_string())
        }
    }
}

/// Maps the `code`/`type` fields of an OpenAI-style error body.
pub fn classify_error_code(code: Option<&str>, kind: Option<&str>) -> Option<GenerationError> {
    let matches = |wanted: &[&str]| {
        [code, kind]
            .into_iter()
            .flatten()
            .any(|value| wanted.iter().any(|w| value.eq_ignore_ascii_case(w)))
    };

    if matches(&[
        "invalid_api_key",
        "authentication_error",
        "unauthenticated",
        "permission_denied",
    ]) {
        Some(GenerationError::InvalidCredential)
    } else if matches(&[
        "insufficient_quota",
        "rate_limit_exceeded",
        "rate_limit_error",
        "resource_exhausted",
    ]) {
        Some(GenerationError::QuotaExceeded)
    } else if matches(&["content_filter", "content_policy_violation", "safety"]) {
        Some(GenerationError::ContentBlocked)
    } else {
        None
    }
}
