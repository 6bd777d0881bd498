//! Completion providers — the backends a debate participant speaks through.
//!
//! Each backend turns a single prompt into a single text completion. The
//! orchestrator only sees the [`CompletionProvider`] trait; which HTTP API
//! answers is decided once, when the provider is built.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
/// Per-turn output cap sent to Anthropic, which requires one.
pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 1000;

/// Errors from completion backends
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key not configured for {0} (set {1})")]
    MissingApiKey(ProviderKind, &'static str),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Supported completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Anthropic, Self::Ollama];

    /// Environment variable holding the API key, if the backend needs one.
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!(
                "unsupported LLM type '{}' (expected one of: openai, anthropic, ollama)",
                other
            )),
        }
    }
}

/// A backend that produces one completion per prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Send `prompt` as a single user message to `model` and return the reply text.
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}

/// Connection settings for every backend.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub ollama_base_url: Option<String>,
    pub anthropic_max_tokens: Option<u32>,
    /// Request timeout; `None` keeps the HTTP client default.
    pub request_timeout: Option<Duration>,
}

impl ProviderSettings {
    fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::Ollama => None,
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

/// Build the backend for `kind`, failing fast when its API key is missing.
pub fn build_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let client = http_client(settings.request_timeout)?;
    let require_key = || -> Result<String, ProviderError> {
        settings.api_key(kind).map(str::to_string).ok_or_else(|| {
            ProviderError::MissingApiKey(kind, kind.api_key_env().unwrap_or_default())
        })
    };

    let provider: Arc<dyn CompletionProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            client,
            require_key()?,
            settings
                .openai_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        )),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
            client,
            require_key()?,
            settings
                .anthropic_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            settings
                .anthropic_max_tokens
                .unwrap_or(DEFAULT_ANTHROPIC_MAX_TOKENS),
        )),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            client,
            settings
                .ollama_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
        )),
    };

    tracing::debug!(provider = %kind, "completion provider ready");
    Ok(provider)
}

fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, ProviderError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ProviderError::Build(e.to_string()))
}

/// Turn a non-2xx response into `RequestFailed` with the body attached.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    api: &str,
) -> Result<reqwest::Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::RequestFailed(format!(
        "{} API error ({}): {}",
        api, status, body
    )))
}

/// Pull a non-empty string out of a JSON response, or report where it was missing.
pub(crate) fn extract_text(
    value: Option<&serde_json::Value>,
    what: &str,
) -> Result<String, ProviderError> {
    match value.and_then(|v| v.as_str()) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        Some(_) => Err(ProviderError::Parse(format!("{} is empty", what))),
        None => Err(ProviderError::Parse(format!("{} missing from response", what))),
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse_and_display() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::Anthropic).unwrap(),
            "\"anthropic\""
        );
    }

    #[test]
    fn test_missing_key_fails_before_any_request() {
        let settings = ProviderSettings::default();
        let err = build_provider(ProviderKind::OpenAi, &settings)
            .err()
            .expect("missing key must fail");
        assert!(matches!(
            err,
            ProviderError::MissingApiKey(ProviderKind::OpenAi, "OPENAI_API_KEY")
        ));

        let err = build_provider(ProviderKind::Anthropic, &settings)
            .err()
            .expect("missing key must fail");
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let settings = ProviderSettings {
            openai_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(build_provider(ProviderKind::OpenAi, &settings).is_err());
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let provider = build_provider(ProviderKind::Ollama, &ProviderSettings::default()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Ollama);
    }

    #[test]
    fn test_extract_text() {
        let value = serde_json::json!({"text": "hello", "blank": "  ", "num": 3});
        assert_eq!(extract_text(value.get("text"), "text").unwrap(), "hello");
        assert!(matches!(
            extract_text(value.get("blank"), "blank"),
            Err(ProviderError::Parse(_))
        ));
        assert!(extract_text(value.get("num"), "num").is_err());
        assert!(extract_text(None, "missing").is_err());
    }
}
