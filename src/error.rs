//! Error types for the scoring core.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Override file not found: {path}")]
    NotFound { path: std::path::PathBuf },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejections of a response vector. Raised before any scoring happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected {expected} responses, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("response {index} is {value}, must be between 1 and 10")]
    OutOfRange { index: usize, value: i64 },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Failures of the clarification oracle. All of these are absorbed by the
/// clarification flow, which falls back to deterministic behavior.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(#[from] LlmError),

    #[error("Could not parse oracle output: {reason}")]
    Parse { reason: String },

    #[error("Oracle chose {candidate:?}, which is not one of the offered candidates")]
    UnknownCandidate { candidate: String },

    #[error("Oracle returned an empty question")]
    EmptyQuestion,
}

/// Misuse of the clarification state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClarificationError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("answer is empty")]
    EmptyAnswer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::WrongLength {
            expected: 108,
            actual: 107,
        };
        let msg = err.to_string();
        assert!(msg.contains("108"), "Should mention the expected length: {msg}");
        assert!(msg.contains("107"), "Should mention the actual length: {msg}");

        let err = ValidationError::OutOfRange {
            index: 12,
            value: 11,
        };
        let msg = err.to_string();
        assert!(msg.contains("response 12"), "Should mention the index: {msg}");
    }

    #[test]
    fn oracle_error_wraps_llm_error() {
        let err: OracleError = LlmError::AuthFailed {
            provider: "openai_compatible".to_string(),
        }
        .into();
        assert!(matches!(err, OracleError::Unavailable(_)));
        assert!(err.to_string().contains("openai_compatible"));
    }

    #[test]
    fn clarification_error_names_state_and_action() {
        let err = ClarificationError::InvalidTransition {
            state: "done",
            action: "submit an answer",
        };
        assert_eq!(err.to_string(), "cannot submit an answer while done");
    }
}
