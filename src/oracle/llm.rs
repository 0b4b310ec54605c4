//! Oracle backed by a chat-completion model.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    ClarificationOracle, JudgementRequest, OracleJudgement, QuestionRequest, extract_json_object,
};
use crate::error::OracleError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

const QUESTION_SYSTEM_PROMPT: &str = "You help a personality assessment tell apart traits or \
developmental levels that scored almost the same. Ask ONE short, concrete, open-ended question \
about a real situation the person has been in. Never name the options, never ask them to rate \
themselves, and do not number the question. Reply with the question only.";

const JUDGE_SYSTEM_PROMPT: &str = "You interpret a person's answer in a personality assessment. \
Decide which ONE of the listed options the answer supports best and how confident you are. \
Respond with a JSON object only: \
{\"primary_candidate\": \"<option name exactly as listed>\", \"confidence\": <number from 0 to 1>, \
\"reasoning\": \"<one sentence>\"}";

/// Questions and judgements produced by an [`LlmProvider`].
pub struct LlmClarificationOracle {
    llm: Arc<dyn LlmProvider>,
}

impl LlmClarificationOracle {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

fn describe_candidates(request_candidates: &[super::Candidate]) -> String {
    request_candidates
        .iter()
        .map(|c| format!("- {} ({:.2}): {}", c.name, c.score, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_question_prompt(request: &QuestionRequest) -> String {
    let mut prompt = format!(
        "Subject: {}\nThe person is undecided between:\n{}\n\nThis is question {} of {}.",
        request.subject,
        describe_candidates(&request.candidates),
        request.question_number,
        request.total_questions,
    );
    if !request.previous.is_empty() {
        prompt.push_str("\n\nAlready asked (do not repeat):");
        for exchange in &request.previous {
            prompt.push_str(&format!(
                "\nQ: {}\nA: {}",
                exchange.question, exchange.answer
            ));
        }
    }
    prompt
}

fn build_judge_prompt(request: &JudgementRequest) -> String {
    format!(
        "Subject: {}\nOptions:\n{}\n\nQuestion: {}\nAnswer: {}",
        request.subject,
        describe_candidates(&request.candidates),
        request.question,
        request.answer,
    )
}

#[derive(Debug, Deserialize)]
struct RawJudgement {
    primary_candidate: String,
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

/// Parse and validate a judge reply against the offered candidates.
fn parse_judgement(text: &str, request: &JudgementRequest) -> Result<OracleJudgement, OracleError> {
    let json = extract_json_object(text).map_err(|reason| OracleError::Parse { reason })?;
    let raw: RawJudgement = serde_json::from_str(json).map_err(|e| OracleError::Parse {
        reason: format!("JSON parse error: {e}"),
    })?;

    let candidate = request
        .candidate_named(&raw.primary_candidate)
        .ok_or_else(|| OracleError::UnknownCandidate {
            candidate: raw.primary_candidate.clone(),
        })?;
    if !raw.confidence.is_finite() {
        return Err(OracleError::Parse {
            reason: format!("confidence {} is not a finite number", raw.confidence),
        });
    }

    Ok(OracleJudgement {
        primary_candidate: candidate.name.clone(),
        confidence: raw.confidence.clamp(0.0, 1.0),
        reasoning: raw.reasoning,
    })
}

/// Strip quoting and list markers a model sometimes wraps a question in.
fn clean_question(text: &str) -> String {
    text.trim()
        .trim_start_matches(|c: char| c == '-' || c == '*' || c.is_ascii_digit() || c == '.')
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}

#[async_trait]
impl ClarificationOracle for LlmClarificationOracle {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, OracleError> {
        let messages = vec![
            ChatMessage::system(QUESTION_SYSTEM_PROMPT),
            ChatMessage::user(build_question_prompt(request)),
        ];
        let completion = CompletionRequest::new(messages)
            .with_temperature(0.7)
            .with_max_tokens(200);

        let response = self.llm.complete(completion).await?;
        let question = clean_question(&response.content);
        if question.is_empty() {
            return Err(OracleError::EmptyQuestion);
        }
        Ok(question)
    }

    async fn judge(&self, request: &JudgementRequest) -> Result<OracleJudgement, OracleError> {
        let prompt = build_judge_prompt(request);
        let messages = vec![
            ChatMessage::system(JUDGE_SYSTEM_PROMPT),
            ChatMessage::user(prompt.clone()),
        ];
        let completion = CompletionRequest::new(messages)
            .with_temperature(0.2)
            .with_max_tokens(300);

        let response = self.llm.complete(completion).await?;

        match parse_judgement(&response.content, request) {
            Ok(judgement) => Ok(judgement),
            Err(first_err) => {
                tracing::debug!("First judgement parse failed: {}", first_err);

                // Retry with a stricter prompt.
                let names = request
                    .candidates
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let retry_messages = vec![
                    ChatMessage::system(JUDGE_SYSTEM_PROMPT),
                    ChatMessage::user(prompt),
                    ChatMessage::assistant(response.content),
                    ChatMessage::user(format!(
                        "That was not usable ({first_err}). Output ONLY the JSON object. \
                         primary_candidate must be exactly one of: {names}. \
                         No markdown, no explanation."
                    )),
                ];
                let retry_request = CompletionRequest::new(retry_messages)
                    .with_temperature(0.0)
                    .with_max_tokens(300);

                let retry_response = self.llm.complete(retry_request).await?;
                parse_judgement(&retry_response.content, request).inspect_err(|e| {
                    tracing::warn!("Judgement unusable after retry: {}", e);
                })
            }
        }
    }
}
