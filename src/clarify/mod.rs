//! Cusp clarification.
//!
//! When scores leave a choice unstable (two traits of a triad, or two
//! Integral levels, almost level with each other) the flow asks a few
//! questions, judges each free-text answer and folds the result back into
//! the scores. [`ClarificationFlow`] is the state machine; a
//! [`ClarificationSubject`] supplies what is being clarified:
//!
//! ```text
//! Idle -> Analyzing -> Done                        (no cusps)
//!                   -> AskingQuestion[0..n] -> Scoring -> Done
//!         AskingQuestion[i] --skip--> Done
//! ```
//!
//! The flow never dead-ends on the oracle. A failed question falls back to
//! a static one; a failed judgement falls back to keyword matching, and an
//! answer nothing can judge simply leaves the scores alone.

mod integral;
mod questions;
mod trait_cusp;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ClarificationError;
use crate::oracle::{
    Candidate, ClarificationOracle, JudgementRequest, OracleJudgement, PriorExchange,
    QuestionRequest,
};

pub use integral::{DISAMBIGUATION_WEIGHT, IntegralClarificationOutcome, IntegralCuspSubject};
pub use questions::{
    KEYWORD_CONFIDENCE, integral_question, keyword_judgement, level_keywords, trait_description,
    trait_keywords, trait_question,
};
pub use trait_cusp::{TraitClarificationOutcome, TraitCuspSubject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Analyzing,
    AskingQuestion { index: usize, total: usize },
    Scoring,
    Done,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::AskingQuestion { .. } => "asking a question",
            Self::Scoring => "scoring",
            Self::Done => "done",
        }
    }
}

/// An unstable choice and the options it is undecided between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cusp {
    /// Triad key, or `"Integral"`.
    pub key: String,
    pub candidates: Vec<Candidate>,
    /// Gap between the top two values.
    pub spread: f64,
}

impl Cusp {
    /// The offered candidate matching `name`, ignoring ASCII case.
    pub fn candidate(&self, name: &str) -> Option<&Candidate> {
        let name = name.trim();
        self.candidates
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CuspAnalysis {
    pub cusps: Vec<Cusp>,
    /// Cusp index for each question, in asking order.
    pub plan: Vec<usize>,
}

impl CuspAnalysis {
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Oracle,
    Static,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
    /// 0-based.
    pub index: usize,
    pub total: usize,
    pub cusp_key: String,
    pub text: String,
    pub source: QuestionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgedBy {
    Oracle,
    Keyword,
    /// Nothing could judge the answer; it made no adjustment.
    None,
}

/// One answered question and what it changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question_index: usize,
    pub cusp_key: String,
    pub question: String,
    pub answer: String,
    pub judged_by: JudgedBy,
    pub chosen: Option<String>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
    /// Candidate name to the change this answer applied.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub adjustments: BTreeMap<String, f64>,
}

/// What a [`ClarificationFlow`] clarifies.
pub trait ClarificationSubject: Send {
    type Input;
    type Outcome: Clone;

    /// Used in log lines.
    fn label(&self) -> &'static str;

    /// Find the cusps in `input` and plan the questions. Resets any state
    /// left from an earlier run.
    fn analyze(&mut self, input: Self::Input) -> CuspAnalysis;

    /// Fold one judged answer in. Returns the change applied per candidate.
    fn apply(&mut self, cusp: &Cusp, chosen: &str, confidence: f64) -> BTreeMap<String, f64>;

    /// Produce the result from everything applied so far.
    fn finish(&mut self, turns: usize, skipped: bool) -> Self::Outcome;

    /// Question used when no oracle question is available.
    fn fallback_question(&self, cusp: &Cusp, index: usize) -> String;
}

/// Drives one clarification conversation.
pub struct ClarificationFlow<S: ClarificationSubject> {
    subject: S,
    oracle: Option<Arc<dyn ClarificationOracle>>,
    state: FlowState,
    analysis: CuspAnalysis,
    current: Option<ClarificationQuestion>,
    turns: Vec<ConversationTurn>,
    outcome: Option<S::Outcome>,
}

impl<S: ClarificationSubject> ClarificationFlow<S> {
    /// A flow that uses only static questions and keyword judging.
    pub fn new(subject: S) -> Self {
        Self {
            subject,
            oracle: None,
            state: FlowState::Idle,
            analysis: CuspAnalysis::default(),
            current: None,
            turns: Vec::new(),
            outcome: None,
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn ClarificationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn analysis(&self) -> &CuspAnalysis {
        &self.analysis
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(
            subject = self.subject.label(),
            from = self.state.name(),
            to = next.name(),
            "Clarification state change"
        );
        self.state = next;
    }

    fn invalid(&self, action: &'static str) -> ClarificationError {
        ClarificationError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Analyze `input` and move to the first question, or straight to
    /// `Done` when there is nothing to clarify. Allowed from `Idle`, and
    /// from `Done` to start over.
    pub async fn begin(&mut self, input: S::Input) -> Result<FlowState, ClarificationError> {
        if !matches!(self.state, FlowState::Idle | FlowState::Done) {
            return Err(self.invalid("begin"));
        }
        self.turns.clear();
        self.outcome = None;
        self.current = None;

        self.transition(FlowState::Analyzing);
        self.analysis = self.subject.analyze(input);

        if self.analysis.is_empty() {
            tracing::info!(subject = self.subject.label(), "No cusps found, skipping clarification");
            self.outcome = Some(self.subject.finish(0, false));
            self.transition(FlowState::Done);
            return Ok(self.state);
        }

        tracing::info!(
            subject = self.subject.label(),
            cusps = self.analysis.cusps.len(),
            questions = self.analysis.plan.len(),
            "Starting clarification"
        );
        self.ask(0).await;
        Ok(self.state)
    }

    pub fn current_question(&self) -> Result<&ClarificationQuestion, ClarificationError> {
        match (&self.state, &self.current) {
            (FlowState::AskingQuestion { .. }, Some(question)) => Ok(question),
            _ => Err(self.invalid("read the current question")),
        }
    }

    /// Judge `answer` to the current question and advance.
    pub async fn submit_answer(
        &mut self,
        answer: &str,
    ) -> Result<ConversationTurn, ClarificationError> {
        let FlowState::AskingQuestion { index, total } = self.state else {
            return Err(self.invalid("submit an answer"));
        };
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ClarificationError::EmptyAnswer);
        }
        let Some(question) = self.current.take() else {
            return Err(self.invalid("submit an answer"));
        };
        let Some(cusp) = self.cusp_for(index).cloned() else {
            return Err(self.invalid("submit an answer"));
        };

        let judgement = self.judge(&cusp, &question.text, answer).await;
        let (judged_by, chosen, confidence, reasoning) = match judgement {
            Some((by, j)) => (by, Some(j.primary_candidate), j.confidence, j.reasoning),
            None => (JudgedBy::None, None, 0.0, String::new()),
        };
        let adjustments = match &chosen {
            Some(name) => self.subject.apply(&cusp, name, confidence),
            None => BTreeMap::new(),
        };

        let turn = ConversationTurn {
            question_index: index,
            cusp_key: cusp.key,
            question: question.text,
            answer: answer.to_string(),
            judged_by,
            chosen,
            confidence,
            reasoning,
            adjustments,
        };
        self.turns.push(turn.clone());

        if index + 1 < total {
            self.ask(index + 1).await;
        } else {
            self.transition(FlowState::Scoring);
            self.outcome = Some(self.subject.finish(self.turns.len(), false));
            self.transition(FlowState::Done);
        }
        Ok(turn)
    }

    /// End early with whatever has been applied so far.
    pub fn skip(&mut self) -> Result<FlowState, ClarificationError> {
        if !matches!(self.state, FlowState::AskingQuestion { .. }) {
            return Err(self.invalid("skip"));
        }
        tracing::info!(
            subject = self.subject.label(),
            answered = self.turns.len(),
            "Clarification skipped"
        );
        self.current = None;
        self.outcome = Some(self.subject.finish(self.turns.len(), true));
        self.transition(FlowState::Done);
        Ok(self.state)
    }

    pub fn outcome(&self) -> Result<&S::Outcome, ClarificationError> {
        match (&self.state, &self.outcome) {
            (FlowState::Done, Some(outcome)) => Ok(outcome),
            _ => Err(self.invalid("read the outcome")),
        }
    }

    pub fn into_outcome(self) -> Result<S::Outcome, ClarificationError> {
        match (self.state, self.outcome) {
            (FlowState::Done, Some(outcome)) => Ok(outcome),
            (state, _) => Err(ClarificationError::InvalidTransition {
                state: state.name(),
                action: "read the outcome",
            }),
        }
    }

    fn cusp_for(&self, index: usize) -> Option<&Cusp> {
        self.analysis
            .plan
            .get(index)
            .and_then(|&c| self.analysis.cusps.get(c))
    }

    async fn ask(&mut self, index: usize) {
        let total = self.analysis.plan.len();
        self.transition(FlowState::AskingQuestion { index, total });

        let Some(cusp) = self.cusp_for(index) else {
            return;
        };
        let (text, source) = match self.oracle_question(cusp, index, total).await {
            Some(text) => (text, QuestionSource::Oracle),
            None => (
                self.subject.fallback_question(cusp, index),
                QuestionSource::Static,
            ),
        };
        let question = ClarificationQuestion {
            index,
            total,
            cusp_key: cusp.key.clone(),
            text,
            source,
        };
        self.current = Some(question);
    }

    async fn oracle_question(&self, cusp: &Cusp, index: usize, total: usize) -> Option<String> {
        let oracle = self.oracle.as_ref()?;
        let request = QuestionRequest {
            subject: cusp.key.clone(),
            candidates: cusp.candidates.clone(),
            question_number: index + 1,
            total_questions: total,
            previous: self
                .turns
                .iter()
                .filter(|t| t.cusp_key == cusp.key)
                .map(|t| PriorExchange {
                    question: t.question.clone(),
                    answer: t.answer.clone(),
                })
                .collect(),
        };
        match oracle.generate_question(&request).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(cusp = %cusp.key, error = %e, "Oracle question failed, using static question");
                None
            }
        }
    }

    async fn judge(
        &self,
        cusp: &Cusp,
        question: &str,
        answer: &str,
    ) -> Option<(JudgedBy, OracleJudgement)> {
        if let Some(oracle) = &self.oracle {
            let request = JudgementRequest {
                subject: cusp.key.clone(),
                candidates: cusp.candidates.clone(),
                question: question.to_string(),
                answer: answer.to_string(),
            };
            match oracle.judge(&request).await {
                Ok(judgement) => match cusp.candidate(&judgement.primary_candidate) {
                    Some(candidate) => {
                        return Some((
                            JudgedBy::Oracle,
                            OracleJudgement {
                                primary_candidate: candidate.name.clone(),
                                confidence: judgement.confidence.clamp(0.0, 1.0),
                                reasoning: judgement.reasoning,
                            },
                        ));
                    }
                    None => tracing::warn!(
                        cusp = %cusp.key,
                        candidate = %judgement.primary_candidate,
                        "Oracle chose a candidate that was not offered, using keyword judgement"
                    ),
                },
                Err(e) => {
                    tracing::warn!(cusp = %cusp.key, error = %e, "Oracle judgement failed, using keyword judgement");
                }
            }
        } else {
            tracing::debug!(cusp = %cusp.key, "No oracle configured, using keyword judgement");
        }

        match keyword_judgement(cusp, answer) {
            Some(name) => Some((
                JudgedBy::Keyword,
                OracleJudgement {
                    primary_candidate: name,
                    confidence: KEYWORD_CONFIDENCE,
                    reasoning: String::new(),
                },
            )),
            None => {
                tracing::warn!(cusp = %cusp.key, "Answer could not be judged, no adjustment made");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ClarificationSettings;
    use crate::scoring::TraitScores;
    use crate::taxonomy::PersonalityTrait;

    /// The first trait of every triad leads by a wide gap, except in
    /// Interpersonal-Communication where Direct and Tactful sit 0.2 apart.
    fn one_cusp_scores() -> TraitScores {
        let mut scores: TraitScores = PersonalityTrait::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, if i % 3 == 0 { 8.0 } else { 4.0 }))
            .collect();
        scores.insert(PersonalityTrait::Direct, 6.8);
        scores.insert(PersonalityTrait::Tactful, 6.6);
        scores.insert(PersonalityTrait::Indirect, 2.0);
        scores
    }

    fn flow() -> ClarificationFlow<TraitCuspSubject> {
        ClarificationFlow::new(TraitCuspSubject::new(ClarificationSettings::default()))
    }

    #[tokio::test]
    async fn wrong_state_operations_are_rejected() {
        let mut flow = flow();
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.current_question().is_err());
        assert!(flow.skip().is_err());
        assert_eq!(
            flow.submit_answer("hello").await.unwrap_err(),
            ClarificationError::InvalidTransition {
                state: "idle",
                action: "submit an answer"
            }
        );
        assert!(flow.outcome().is_err());
    }

    #[tokio::test]
    async fn empty_answer_keeps_the_question() {
        let mut flow = flow();
        flow.begin(one_cusp_scores()).await.unwrap();
        assert_eq!(flow.submit_answer("   ").await.unwrap_err(), ClarificationError::EmptyAnswer);
        assert_eq!(flow.state(), FlowState::AskingQuestion { index: 0, total: 1 });
        assert_eq!(flow.current_question().unwrap().cusp_key, "Interpersonal-Communication");
    }

    #[tokio::test]
    async fn static_question_and_keyword_judgement_without_oracle() {
        let mut flow = flow();
        flow.begin(one_cusp_scores()).await.unwrap();
        let question = flow.current_question().unwrap().clone();
        assert_eq!(question.source, QuestionSource::Static);
        assert!(question.text.contains("direct or tactful"));

        let turn = flow
            .submit_answer("I was blunt and told them straight away.")
            .await
            .unwrap();
        assert_eq!(turn.judged_by, JudgedBy::Keyword);
        assert_eq!(turn.chosen.as_deref(), Some("Direct"));
        assert_eq!(turn.confidence, KEYWORD_CONFIDENCE);
        assert_eq!(flow.state(), FlowState::Done);

        let outcome = flow.outcome().unwrap();
        assert_eq!(outcome.turns, 1);
        assert!(!outcome.skipped);
        let direct = outcome.scores.get_or_neutral(PersonalityTrait::Direct);
        let tactful = outcome.scores.get_or_neutral(PersonalityTrait::Tactful);
        assert!((direct - 7.05).abs() < 1e-9, "direct = {direct}");
        assert!((tactful - 6.475).abs() < 1e-9, "tactful = {tactful}");
    }

    #[tokio::test]
    async fn unjudgeable_answer_changes_nothing() {
        let mut flow = flow();
        let scores = one_cusp_scores();
        flow.begin(scores.clone()).await.unwrap();
        let turn = flow.submit_answer("Hard to say.").await.unwrap();
        assert_eq!(turn.judged_by, JudgedBy::None);
        assert!(turn.adjustments.is_empty());
        assert_eq!(flow.outcome().unwrap().scores, scores);
    }

    #[tokio::test]
    async fn done_flow_can_begin_again() {
        let mut flow = flow();
        flow.begin(one_cusp_scores()).await.unwrap();
        flow.skip().unwrap();
        assert!(flow.skip().is_err());
        assert_eq!(
            flow.begin(one_cusp_scores()).await.unwrap(),
            FlowState::AskingQuestion { index: 0, total: 1 }
        );
        assert!(flow.turns().is_empty());
    }
}
