//! The external judge consulted during clarification.
//!
//! A [`ClarificationOracle`] writes the disambiguating question for a cusp
//! and decides which candidate a free-text answer points to. The flow
//! treats every oracle failure as recoverable and falls back to static
//! questions and keyword matching.

mod extract;
mod llm;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

pub use extract::extract_json_object;
pub use llm::LlmClarificationOracle;

/// One of the options a cusp is undecided between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub description: String,
    /// Current score or share, for context.
    pub score: f64,
    /// Words that point to this candidate when no oracle judgement is available.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// A question already asked and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorExchange {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// What is being clarified, e.g. `"Interpersonal-Trust"`.
    pub subject: String,
    pub candidates: Vec<Candidate>,
    /// 1-based.
    pub question_number: usize,
    pub total_questions: usize,
    pub previous: Vec<PriorExchange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgementRequest {
    pub subject: String,
    pub candidates: Vec<Candidate>,
    pub question: String,
    pub answer: String,
}

impl JudgementRequest {
    /// The offered candidate matching `name`, ignoring ASCII case.
    pub fn candidate_named(&self, name: &str) -> Option<&Candidate> {
        let name = name.trim();
        self.candidates
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Which candidate an answer favours, and how strongly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleJudgement {
    pub primary_candidate: String,
    /// 0 to 1.
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[async_trait]
pub trait ClarificationOracle: Send + Sync {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, OracleError>;

    async fn judge(&self, request: &JudgementRequest) -> Result<OracleJudgement, OracleError>;
}
