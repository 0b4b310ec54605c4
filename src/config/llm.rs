use std::time::Duration;

use secrecy::SecretString;

use crate::config::helpers::{optional_env, parse_optional_env};
use crate::error::ConfigError;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Resolve from `TPS_LLM_*`. Returns `None` when no base URL is set,
    /// which leaves clarification on its static questions.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(base_url) = optional_env("TPS_LLM_BASE_URL")? else {
            return Ok(None);
        };
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "TPS_LLM_BASE_URL".to_string(),
                message: format!("'{base_url}' is not an http(s) URL"),
            });
        }
        let api_key = optional_env("TPS_LLM_API_KEY")?.map(SecretString::from);
        let model = optional_env("TPS_LLM_MODEL")?.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs: u64 = parse_optional_env("TPS_LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TPS_LLM_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Some(Self {
            base_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}
