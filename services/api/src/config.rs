//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use doc_simplifier_core::{ExtractionLimits, UploadPolicy};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Takes precedence over any key supplied with a request. Never logged.
    pub gemini_api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub max_pages: usize,
    pub max_text_chars: usize,
    /// `None` disables the upload size check.
    pub max_upload_bytes: Option<usize>,
    pub cache_ttl: Duration,
    /// A session not written for this long has ended and is dropped.
    pub session_ttl: Duration,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // --- Server Settings ---
        let bind_address = parse_var("BIND_ADDRESS", &var_or("BIND_ADDRESS", "0.0.0.0:3000"))?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;
        let allowed_origin = var_or("ALLOWED_ORIGIN", "http://localhost:3000");

        // --- Provider Settings ---
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        let api_base = var_or("GENERATION_API_BASE", DEFAULT_API_BASE);
        let model = var_or("GENERATION_MODEL", "gemini-1.5-flash");

        // --- Processing Limits ---
        let defaults = ExtractionLimits::default();
        let max_pages: usize = parse_var("MAX_PAGES", &var_or("MAX_PAGES", &defaults.max_pages.to_string()))?;
        if max_pages == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_PAGES".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let max_text_chars = parse_var(
            "MAX_TEXT_CHARS",
            &var_or("MAX_TEXT_CHARS", &defaults.max_text_chars.to_string()),
        )?;

        let default_upload = UploadPolicy::default().max_bytes.unwrap_or(0);
        let max_upload_bytes: usize = parse_var(
            "MAX_UPLOAD_BYTES",
            &var_or("MAX_UPLOAD_BYTES", &default_upload.to_string()),
        )?;
        let max_upload_bytes = (max_upload_bytes > 0).then_some(max_upload_bytes);

        let cache_ttl_secs: u64 = parse_var("CACHE_TTL_SECS", &var_or("CACHE_TTL_SECS", "3600"))?;
        let session_ttl_secs: u64 =
            parse_var("SESSION_TTL_SECS", &var_or("SESSION_TTL_SECS", "3600"))?;

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            api_base,
            model,
            max_pages,
            max_text_chars,
            max_upload_bytes,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            session_ttl: Duration::from_secs(session_ttl_secs),
            allowed_origin,
        })
    }

    pub fn extraction_limits(&self) -> ExtractionLimits {
        ExtractionLimits {
            max_pages: self.max_pages,
            max_text_chars: self.max_text_chars,
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.max_upload_bytes,
            ..UploadPolicy::default()
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}
