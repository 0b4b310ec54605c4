//! LLM integration used by the clarification oracle.

mod openai_compatible;
pub mod provider;

use std::sync::Arc;

pub use openai_compatible::OpenAiCompatibleProvider;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Build the configured provider.
pub fn create_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    tracing::info!(
        base_url = %config.base_url,
        model = %config.model,
        "Using OpenAI-compatible endpoint"
    );
    Ok(Arc::new(OpenAiCompatibleProvider::new(config.clone())?))
}
