//! Application configuration. API credentials, endpoint, pool sizing.

use crate::domain::DomainError;
use serde::Deserialize;

/// Default cadence at which the consumer polls the result conduit.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default whole-request timeout for one analysis call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // AI Analysis Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// AI API key. Read from CHAT_DIGEST_AI_API_KEY, falling back to OPENAI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// AI API URL. Defaults to OpenAI. Read from CHAT_DIGEST_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// AI model name. Defaults to "gpt-4o-mini". Read from CHAT_DIGEST_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Use the mock adapter instead of a real API (no key needed). Read from CHAT_DIGEST_AI_MOCK.
    #[serde(default)]
    pub ai_mock: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Max concurrent analysis calls. Read from CHAT_DIGEST_MAX_CONCURRENCY.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Timeout in seconds for a single analysis call. Read from CHAT_DIGEST_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Result polling cadence in ms. Read from CHAT_DIGEST_POLL_INTERVAL_MS.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("CHAT_DIGEST").try_parsing(true));
        if let Ok(path) = std::env::var("CHAT_DIGEST_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the AI API key if configured.
    ///
    /// Reads from config, then CHAT_DIGEST_AI_API_KEY, then OPENAI_API_KEY.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("CHAT_DIGEST_AI_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns the API key or `MissingCredential`. Call before any transcript is parsed.
    pub fn require_ai_api_key(&self) -> Result<String, DomainError> {
        self.ai_api_key().ok_or_else(|| {
            DomainError::MissingCredential(
                "set CHAT_DIGEST_AI_API_KEY or OPENAI_API_KEY (env or .env)".to_string(),
            )
        })
    }

    /// Returns the AI API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .or_else(|| std::env::var("CHAT_DIGEST_AI_API_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Returns the AI model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .or_else(|| std::env::var("CHAT_DIGEST_AI_MODEL").ok())
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    /// Returns true if the mock adapter was requested.
    pub fn use_mock_ai(&self) -> bool {
        self.ai_mock.unwrap_or(false)
    }

    /// Returns max concurrent calls. Defaults to DEFAULT_MAX_CONCURRENCY; never below 1.
    pub fn max_concurrency_or_default(&self) -> usize {
        self.max_concurrency
            .unwrap_or(crate::usecases::DEFAULT_MAX_CONCURRENCY)
            .max(1)
    }

    /// Returns per-call timeout in seconds. Defaults to 120.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Returns result polling cadence in ms. Defaults to 100.
    pub fn poll_interval_ms_or_default(&self) -> u64 {
        self.poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .max(1)
    }
}
