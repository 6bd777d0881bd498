//! Runtime configuration from the environment.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Variables already set in the process environment
//! 2. A `.env` file in the working directory (loaded by [`load_dotenv`])
//! 3. Built-in defaults (public API endpoints, local Ollama)
//!
//! | Variable                      | Default                        |
//! |-------------------------------|--------------------------------|
//! | `OPENAI_API_KEY`              | required for `openai`          |
//! | `ANTHROPIC_API_KEY`           | required for `anthropic`       |
//! | `OPENAI_BASE_URL`             | `https://api.openai.com/v1`    |
//! | `ANTHROPIC_BASE_URL`          | `https://api.anthropic.com/v1` |
//! | `OLLAMA_BASE_URL`             | `http://localhost:11434`       |
//! | `ANTHROPIC_MAX_TOKENS`        | `1000`                         |
//! | `DEBATE_REQUEST_TIMEOUT_SECS` | unset (client default)         |

use std::path::{Path, PathBuf};
use std::time::Duration;

use coordination::ProviderSettings;
use thiserror::Error;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";
const ENV_OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
const ENV_ANTHROPIC_MAX_TOKENS: &str = "ANTHROPIC_MAX_TOKENS";
const ENV_REQUEST_TIMEOUT_SECS: &str = "DEBATE_REQUEST_TIMEOUT_SECS";

/// Template directory name looked up in the working directory.
const LOCAL_TEMPLATE_DIR: &str = "templates";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Everything the runner needs besides the command line.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub providers: ProviderSettings,
}

impl Settings {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let settings = Self {
            providers: ProviderSettings {
                openai_api_key: non_empty(ENV_OPENAI_API_KEY),
                anthropic_api_key: non_empty(ENV_ANTHROPIC_API_KEY),
                openai_base_url: non_empty(ENV_OPENAI_BASE_URL),
                anthropic_base_url: non_empty(ENV_ANTHROPIC_BASE_URL),
                ollama_base_url: non_empty(ENV_OLLAMA_BASE_URL),
                anthropic_max_tokens: parse_number(
                    ENV_ANTHROPIC_MAX_TOKENS,
                    non_empty(ENV_ANTHROPIC_MAX_TOKENS),
                )?
                .map(|n| n as u32),
                request_timeout: parse_number(
                    ENV_REQUEST_TIMEOUT_SECS,
                    non_empty(ENV_REQUEST_TIMEOUT_SECS),
                )?
                .map(Duration::from_secs),
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.providers.anthropic_max_tokens == Some(0) {
            return Err(ConfigError::Zero(ENV_ANTHROPIC_MAX_TOKENS));
        }
        if self.providers.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Zero(ENV_REQUEST_TIMEOUT_SECS));
        }
        Ok(())
    }
}

fn parse_number(var: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|value| {
        let trimmed = value.trim();
        trimmed
            .parse::<u32>()
            .map(u64::from)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                value: trimmed.to_string(),
            })
    })
    .transpose()
}

/// Load `.env` from the working directory if present. Returns the file used.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Pick the template directory: explicit choice, then `./templates`, then the
/// templates shipped with the source tree.
pub fn resolve_template_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let local = PathBuf::from(LOCAL_TEMPLATE_DIR);
    if local.is_dir() {
        return local;
    }
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(LOCAL_TEMPLATE_DIR)
}
