//! Chat Completions client for any endpoint that speaks the OpenAI wire
//! format: hosted APIs, local model servers and proxies alike.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::llm::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};

const PROVIDER: &str = "openai_compatible";

/// Error bodies are cut to this many characters.
const ERROR_BODY_LIMIT: usize = 200;

pub struct OpenAiCompatibleProvider {
    client: Client,
    config: LlmConfig,
    endpoint: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| failed(format!("could not build HTTP client: {e}")))?;
        let endpoint = completions_endpoint(&config.base_url);
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    async fn post(&self, body: &WireRequest<'_>) -> Result<String, LlmError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        tracing::debug!(endpoint = %self.endpoint, messages = body.messages.len(), "Requesting completion");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint = %self.endpoint, error = %e, "Completion request failed");
            failed(e.to_string())
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let text = response
            .text()
            .await
            .map_err(|e| failed(format!("could not read response body: {e}")))?;

        if status.is_success() {
            Ok(text)
        } else {
            tracing::warn!(status = status.as_u16(), "Completion endpoint returned an error");
            Err(status_error(status, &text, retry_after))
        }
    }
}

/// `<base>/v1/chat/completions`, without doubling a `/v1` the base already has.
fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{base}/v1/chat/completions")
}

fn failed(reason: String) -> LlmError {
    LlmError::RequestFailed {
        provider: PROVIDER.to_string(),
        reason,
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(ERROR_BODY_LIMIT).collect()
}

fn status_error(status: StatusCode, body: &str, retry_after: Option<Duration>) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED => LlmError::AuthFailed {
            provider: PROVIDER.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after,
        },
        _ => failed(format!("HTTP {}: {}", status.as_u16(), truncate(body))),
    }
}

/// Decode a successful response body into the first choice.
fn parse_completion(body: &str) -> Result<CompletionResponse, LlmError> {
    let reply: WireResponse = serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse {
        provider: PROVIDER.to_string(),
        reason: format!("{e}; body starts {:?}", truncate(body)),
    })?;
    let Some(choice) = reply.choices.into_iter().next() else {
        return Err(LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "response has no choices".to_string(),
        });
    };
    let usage = reply.usage.unwrap_or_default();

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        finish_reason: match choice.finish_reason.as_deref() {
            Some("stop") => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Unknown,
        },
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    })
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = WireRequest {
            model: &self.config.model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let text = self.post(&body).await?;
        let completion = parse_completion(&text)?;
        tracing::debug!(
            model = %self.config.model,
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            "Completion received"
        );
        Ok(completion)
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            role: message.role,
            content: &message.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReply,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
