//! Clarification conversations driven through the public flow API with a
//! scripted oracle.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use tps_scoring::clarify::{
    ClarificationFlow, FlowState, IntegralCuspSubject, JudgedBy, QuestionSource, TraitCuspSubject,
};
use tps_scoring::config::ClarificationSettings;
use tps_scoring::error::OracleError;
use tps_scoring::mapping::{IntegralLevel, IntegralWeights, LevelDistribution};
use tps_scoring::oracle::{
    ClarificationOracle, JudgementRequest, OracleJudgement, QuestionRequest,
};
use tps_scoring::scoring::{DominantTraits, TraitScores};
use tps_scoring::taxonomy::PersonalityTrait;

/// How the scripted oracle judges every answer.
#[derive(Clone)]
enum Verdict {
    Pick(&'static str, f64),
    Fail,
}

struct ScriptedOracle {
    questions_work: bool,
    verdict: Verdict,
    question_requests: Mutex<Vec<QuestionRequest>>,
}

impl ScriptedOracle {
    fn new(questions_work: bool, verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            questions_work,
            verdict,
            question_requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ClarificationOracle for ScriptedOracle {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, OracleError> {
        self.question_requests.lock().unwrap().push(request.clone());
        if self.questions_work {
            Ok(format!(
                "Question {} of {} about {}?",
                request.question_number, request.total_questions, request.subject
            ))
        } else {
            Err(OracleError::EmptyQuestion)
        }
    }

    async fn judge(&self, _request: &JudgementRequest) -> Result<OracleJudgement, OracleError> {
        match self.verdict.clone() {
            Verdict::Pick(name, confidence) => Ok(OracleJudgement {
                primary_candidate: name.to_string(),
                confidence,
                reasoning: "scripted".to_string(),
            }),
            Verdict::Fail => Err(OracleError::Parse {
                reason: "not JSON".to_string(),
            }),
        }
    }
}

/// Every triad led clearly by its first trait.
fn clear_scores() -> TraitScores {
    PersonalityTrait::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| (*t, [8.0, 5.0, 2.0][i % 3]))
        .collect()
}

/// Clear scores except for a Direct/Tactful near tie.
fn communication_cusp() -> TraitScores {
    let mut scores = clear_scores();
    scores.insert(PersonalityTrait::Direct, 6.8);
    scores.insert(PersonalityTrait::Tactful, 6.6);
    scores.insert(PersonalityTrait::Indirect, 2.0);
    scores
}

/// Clear scores except for two near ties.
fn two_cusps() -> TraitScores {
    let mut scores = communication_cusp();
    scores.insert(PersonalityTrait::Skeptical, 7.9);
    scores
}

fn trait_flow() -> ClarificationFlow<TraitCuspSubject> {
    ClarificationFlow::new(TraitCuspSubject::new(ClarificationSettings::default()))
}

#[tokio::test]
async fn nothing_to_clarify_finishes_immediately() {
    let oracle = ScriptedOracle::new(true, Verdict::Pick("Direct", 1.0));
    let mut flow = trait_flow().with_oracle(oracle.clone());

    let state = flow.begin(clear_scores()).await.unwrap();
    assert_eq!(state, FlowState::Done);
    assert!(flow.current_question().is_err());

    let outcome = flow.into_outcome().unwrap();
    assert_eq!(outcome.scores, clear_scores());
    assert!(outcome.adjustments.is_empty());
    assert_eq!(outcome.turns, 0);
    assert!(!outcome.skipped);
    assert!(oracle.question_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oracle_questions_and_judgements_drive_adjustments() {
    let oracle = ScriptedOracle::new(true, Verdict::Pick("tactful", 0.8));
    let mut flow = trait_flow().with_oracle(oracle.clone());

    let state = flow.begin(communication_cusp()).await.unwrap();
    assert_eq!(state, FlowState::AskingQuestion { index: 0, total: 1 });
    let question = flow.current_question().unwrap();
    assert_eq!(question.source, QuestionSource::Oracle);
    assert_eq!(question.text, "Question 1 of 1 about Interpersonal-Communication?");

    let turn = flow.submit_answer("I try to soften it first.").await.unwrap();
    assert_eq!(turn.judged_by, JudgedBy::Oracle);
    assert_eq!(turn.chosen.as_deref(), Some("Tactful"));
    assert_eq!(turn.reasoning, "scripted");
    assert_eq!(flow.state(), FlowState::Done);

    let outcome = flow.outcome().unwrap();
    let tactful = outcome.scores.get_or_neutral(PersonalityTrait::Tactful);
    let direct = outcome.scores.get_or_neutral(PersonalityTrait::Direct);
    assert!((tactful - 7.0).abs() < 1e-9, "tactful = {tactful}");
    assert!((direct - 6.6).abs() < 1e-9, "direct = {direct}");
    assert_eq!(outcome.turns, 1);
}

#[tokio::test]
async fn failing_oracle_falls_back_to_static_questions_and_keywords() {
    let oracle = ScriptedOracle::new(false, Verdict::Fail);
    let mut flow = trait_flow().with_oracle(oracle.clone());

    flow.begin(communication_cusp()).await.unwrap();
    let question = flow.current_question().unwrap();
    assert_eq!(question.source, QuestionSource::Static);
    assert!(question.text.contains("direct"), "{}", question.text);

    let turn = flow
        .submit_answer("I was blunt and told them straight away.")
        .await
        .unwrap();
    assert_eq!(turn.judged_by, JudgedBy::Keyword);
    assert_eq!(turn.chosen.as_deref(), Some("Direct"));
    assert_eq!(oracle.question_requests.lock().unwrap().len(), 1);

    let outcome = flow.into_outcome().unwrap();
    assert!(
        outcome.scores.get_or_neutral(PersonalityTrait::Direct)
            > communication_cusp().get_or_neutral(PersonalityTrait::Direct)
    );
}

#[tokio::test]
async fn judgement_outside_the_candidates_is_not_trusted() {
    let oracle = ScriptedOracle::new(true, Verdict::Pick("Indirect", 1.0));
    let mut flow = trait_flow().with_oracle(oracle);

    flow.begin(communication_cusp()).await.unwrap();
    let turn = flow.submit_answer("Hard to say really.").await.unwrap();
    assert_eq!(turn.judged_by, JudgedBy::None);
    assert_eq!(turn.chosen, None);
    assert!(turn.adjustments.is_empty());

    let outcome = flow.into_outcome().unwrap();
    assert!(outcome.adjustments.is_empty());
    assert_eq!(outcome.scores, communication_cusp());
}

#[tokio::test]
async fn skipping_keeps_answers_given_so_far() {
    let oracle = ScriptedOracle::new(true, Verdict::Pick("Direct", 1.0));
    let mut flow = trait_flow().with_oracle(oracle.clone());

    let state = flow.begin(two_cusps()).await.unwrap();
    assert_eq!(state, FlowState::AskingQuestion { index: 0, total: 2 });
    // Tighter spread is asked first.
    assert_eq!(
        flow.current_question().unwrap().cusp_key,
        "Interpersonal-Trust"
    );
    // Not a Trust candidate, so nothing moves for the first cusp.
    flow.submit_answer("whatever").await.unwrap();
    assert_eq!(flow.state(), FlowState::AskingQuestion { index: 1, total: 2 });
    assert_eq!(
        flow.current_question().unwrap().cusp_key,
        "Interpersonal-Communication"
    );

    assert_eq!(flow.skip().unwrap(), FlowState::Done);
    assert!(flow.skip().is_err());
    let outcome = flow.outcome().unwrap();
    assert!(outcome.skipped);
    assert_eq!(outcome.turns, 1);
    assert_eq!(outcome.scores, two_cusps());

    let requests = oracle.question_requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].question_number, 2);
    // History is kept per cusp.
    assert!(requests[1].previous.is_empty());
}

/// Orange and Green nearly tied.
fn close_levels() -> LevelDistribution {
    use IntegralLevel::*;
    LevelDistribution::normalized([
        (Beige, 0.04),
        (Purple, 0.05),
        (Red, 0.08),
        (Blue, 0.11),
        (Orange, 0.30),
        (Green, 0.29),
        (Yellow, 0.10),
        (Turquoise, 0.03),
    ])
}

#[tokio::test]
async fn integral_answers_blend_toward_the_chosen_level() {
    let oracle = ScriptedOracle::new(true, Verdict::Pick("Green", 0.9));
    let subject = IntegralCuspSubject::new(
        ClarificationSettings::default(),
        DominantTraits::new(),
        IntegralWeights::default(),
    );
    let mut flow = ClarificationFlow::new(subject).with_oracle(oracle.clone());

    let state = flow.begin(close_levels()).await.unwrap();
    assert_eq!(state, FlowState::AskingQuestion { index: 0, total: 3 });
    for answer in ["Working together", "Everyone gets a say", "Fairness matters"] {
        let turn = flow.submit_answer(answer).await.unwrap();
        assert_eq!(turn.chosen.as_deref(), Some("Green"));
    }
    assert_eq!(flow.state(), FlowState::Done);

    let outcome = flow.into_outcome().unwrap();
    assert_eq!(outcome.detail.primary_level, IntegralLevel::Green);
    assert_eq!(outcome.detail.secondary_level, IntegralLevel::Orange);
    assert_eq!(outcome.turns, 3);
    assert!((outcome.detail.distribution.total() - 1.0).abs() < 1e-9);

    // Later questions see the earlier exchanges about the same cusp.
    let requests = oracle.question_requests.lock().unwrap();
    assert_eq!(requests[2].previous.len(), 2);
    assert_eq!(requests[2].previous[0].answer, "Working together");
}

#[tokio::test]
async fn integral_without_oracle_uses_keywords() {
    let subject = IntegralCuspSubject::new(
        ClarificationSettings::default(),
        DominantTraits::new(),
        IntegralWeights::default(),
    );
    let mut flow = ClarificationFlow::new(subject);

    flow.begin(close_levels()).await.unwrap();
    assert_eq!(
        flow.current_question().unwrap().source,
        QuestionSource::Static
    );
    let turn = flow
        .submit_answer("Harmony in the community matters most to me")
        .await
        .unwrap();
    assert_eq!(turn.judged_by, JudgedBy::Keyword);
    assert_eq!(turn.chosen.as_deref(), Some("Green"));

    flow.skip().unwrap();
    let outcome = flow.into_outcome().unwrap();
    assert!(outcome.skipped);
    assert_eq!(outcome.detail.primary_level, IntegralLevel::Green);
}
