//! crates/doc_simplifier_core/src/dispatch.rs
//!
//! The AI request dispatcher: truncate, prompt, memoize, call, normalize.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, ResultCache};
use crate::classify::classify_provider_message;
use crate::domain::{AiResult, Credential, OutputKind};
use crate::error::GenerationError;
use crate::ports::{GenerationRequest, ProviderFailure, ProviderReply, TextGenerationService};

/// Returns the first `limit` characters of `text`, on a character boundary.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Sends one prompt per output kind to the provider, behind the result cache.
#[derive(Clone)]
pub struct AiDispatcher {
    generator: Arc<dyn TextGenerationService>,
    cache: Arc<ResultCache>,
    model: String,
}

impl AiDispatcher {
    pub fn new(
        generator: Arc<dyn TextGenerationService>,
        cache: Arc<ResultCache>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            cache,
            model: model.into(),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Produces the `kind` output for `text`. A cache hit, including a cached
    /// failure, is returned without contacting the provider.
    pub async fn run(&self, kind: OutputKind, text: &str, credential: &Credential) -> AiResult {
        let key = CacheKey::new(kind, text, credential);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", kind.as_str());
            return cached;
        }

        let truncated = truncate_chars(text, kind.input_char_limit());
        let prompt = kind.render_prompt(truncated);
        let request = GenerationRequest {
            credential,
            model: &self.model,
            prompt: &prompt,
        };

        info!("Requesting {} from model {}", kind.as_str(), self.model);
        let result = match self.generator.generate(request).await {
            Ok(reply) => normalize_reply(kind, reply),
            Err(failure) => AiResult::failure(kind, normalize_failure(failure)),
        };

        if let Some(error) = result.error() {
            warn!("{} generation failed: {}", kind.as_str(), error);
        }

        self.cache.insert(key, result.clone());
        result
    }
}

fn normalize_reply(kind: OutputKind, reply: ProviderReply) -> AiResult {
    if reply.blocked {
        return AiResult::failure(kind, GenerationError::ContentBlocked);
    }
    match reply.text {
        Some(text) if !text.trim().is_empty() => AiResult::success(kind, text),
        _ => AiResult::failure(kind, GenerationError::EmptyResponse),
    }
}

fn normalize_failure(failure: ProviderFailure) -> GenerationError {
    match failure {
        ProviderFailure::Classified(error) => error,
        ProviderFailure::Message(message) => classify_provider_message(&message),
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    use crate::ports::{
        GenerationRequest, ProviderFailure, ProviderReply, TextGenerationService,
    };

    /// Replays scripted replies in order and records every prompt it receives.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<ProviderReply, ProviderFailure>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(replies: impl IntoIterator<Item = Result<ProviderReply, ProviderFailure>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().len()
        }
    }

    #[async_trait]
    impl TextGenerationService for ScriptedGenerator {
        async fn generate(
            &self,
            request: GenerationRequest<'_>,
        ) -> Result<ProviderReply, ProviderFailure> {
            self.prompts.lock().push(request.prompt.to_string());
            self.replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(ProviderReply::text("default reply")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::ScriptedGenerator;
    use super::*;
    use crate::domain::CredentialSource;

    fn credential(key: &str) -> Credential {
        Credential::new(key, CredentialSource::Supplied)
    }

    fn dispatcher(generator: Arc<ScriptedGenerator>) -> AiDispatcher {
        AiDispatcher::new(generator, Arc::new(ResultCache::default()), "test-model")
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[tokio::test]
    async fn prompt_contains_only_the_leading_characters() {
        let generator = Arc::new(ScriptedGenerator::default());
        let text = format!("{}{}", "a".repeat(15_000), "TAIL");
        dispatcher(generator.clone())
            .run(OutputKind::Summary, &text, &credential("k"))
            .await;

        let prompts = generator.prompts.lock();
        assert!(prompts[0].starts_with("Please provide a 3-sentence summary"));
        assert!(!prompts[0].contains("TAIL"));
    }

    #[tokio::test]
    async fn identical_requests_hit_the_provider_once() {
        let generator = Arc::new(ScriptedGenerator::new([Ok(ProviderReply::text("one"))]));
        let dispatcher = dispatcher(generator.clone());

        let first = dispatcher.run(OutputKind::Summary, "doc", &credential("k")).await;
        let second = dispatcher.run(OutputKind::Summary, "doc", &credential("k")).await;

        assert_eq!(first, second);
        assert_eq!(first.text(), Some("one"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn cached_failures_are_returned_unchanged() {
        let generator = Arc::new(ScriptedGenerator::new([
            Err(ProviderFailure::Message("Quota exceeded for project".into())),
            Ok(ProviderReply::text("would succeed now")),
        ]));
        let dispatcher = dispatcher(generator.clone());

        let first = dispatcher.run(OutputKind::KeyPoints, "doc", &credential("k")).await;
        let second = dispatcher.run(OutputKind::KeyPoints, "doc", &credential("k")).await;

        assert_eq!(first.error(), Some(&GenerationError::QuotaExceeded));
        assert_eq!(second, first);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn different_credentials_are_not_shared() {
        let generator = Arc::new(ScriptedGenerator::default());
        let dispatcher = dispatcher(generator.clone());
        dispatcher.run(OutputKind::Summary, "doc", &credential("a")).await;
        dispatcher.run(OutputKind::Summary, "doc", &credential("b")).await;
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn blank_or_missing_text_is_an_empty_response() {
        let generator = Arc::new(ScriptedGenerator::new([
            Ok(ProviderReply::text("   ")),
            Ok(ProviderReply::default()),
        ]));
        let dispatcher = dispatcher(generator);

        let blank = dispatcher.run(OutputKind::Summary, "one", &credential("k")).await;
        let missing = dispatcher.run(OutputKind::Summary, "two", &credential("k")).await;
        assert_eq!(blank.error(), Some(&GenerationError::EmptyResponse));
        assert_eq!(missing.error(), Some(&GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn blocked_replies_and_classified_failures_pass_through() {
        let generator = Arc::new(ScriptedGenerator::new([
            Ok(ProviderReply::blocked()),
            Err(ProviderFailure::Classified(GenerationError::NetworkError)),
            Err(ProviderFailure::Message("something odd".into())),
        ]));
        let dispatcher = dispatcher(generator);

        let blocked = dispatcher.run(OutputKind::Summary, "a", &credential("k")).await;
        let network = dispatcher.run(OutputKind::Summary, "b", &credential("k")).await;
        let unknown = dispatcher.run(OutputKind::Summary, "c", &credential("k")).await;

        assert_eq!(blocked.error(), Some(&GenerationError::ContentBlocked));
        assert_eq!(network.error(), Some(&GenerationError::NetworkError));
        assert_eq!(
            unknown.error(),
            Some(&GenerationError::UnknownProviderError("something odd".into()))
        );
    }

    #[tokio::test]
    async fn clearing_the_cache_forces_a_new_call() {
        let generator = Arc::new(ScriptedGenerator::default());
        let dispatcher = dispatcher(generator.clone());
        dispatcher.run(OutputKind::Summary, "doc", &credential("k")).await;
        dispatcher.cache().clear();
        dispatcher.run(OutputKind::Summary, "doc", &credential("k")).await;
        assert_eq!(generator.calls(), 2);
    }
}
