//! crates/doc_simplifier_core/src/classify.rs
//!
//! Keyword classification of free-form provider failure messages.
//!
//! This is the fallback path. Adapters that can read a structured error code
//! should map it directly and return `ProviderFailure::Classified`. Substring
//! matching breaks whenever a provider rewords its messages, so treat the
//! keyword lists as best effort rather than a contract.

use crate::error::GenerationError;

const CREDENTIAL_KEYWORDS: &[&str] = &[
    "api key",
    "api_key",
    "apikey",
    "authentication",
    "unauthenticated",
    "unauthorized",
    "permission denied",
];

const QUOTA_KEYWORDS: &[&str] = &[
    "quota",
    "rate limit",
    "rate_limit",
    "resource exhausted",
    "resource_exhausted",
    "too many requests",
];

const NETWORK_KEYWORDS: &[&str] = &[
    "network",
    "connection",
    "connect error",
    "timed out",
    "timeout",
    "dns",
    "unreachable",
];

const BLOCKED_KEYWORDS: &[&str] = &["safety", "blocked"];

/// Maps a provider message onto the taxonomy. Checked in order: credential,
/// quota, network, safety block. Anything else keeps the original message.
pub fn classify_provider_message(message: &str) -> GenerationError {
    let lowered = message.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if matches(CREDENTIAL_KEYWORDS) {
        GenerationError::InvalidCredential
    } else if matches(QUOTA_KEYWORDS) {
        GenerationError::QuotaExceeded
    } else if matches(NETWORK_KEYWORDS) {
        GenerationError::NetworkError
    } else if matches(BLOCKED_KEYWORDS) {
        GenerationError::ContentBlocked
    } else {
        GenerationError::UnknownProviderError(message.to_string())
    }
}
