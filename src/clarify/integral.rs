//! Clarifying the leading Integral level.
//!
//! Each judged answer votes for one of the nearly tied levels with its
//! confidence. When the questions are done, the level with the most votes
//! is mixed into the preliminary distribution as a one-hot signal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ClarificationSubject, Cusp, CuspAnalysis, questions};
use crate::config::{ClarificationSettings, MAX_CLARIFY_QUESTIONS};
use crate::mapping::{IntegralDetail, IntegralLevel, IntegralWeights, LevelDistribution};
use crate::oracle::Candidate;
use crate::scoring::DominantTraits;

/// Share of the final distribution given to the clarified level.
pub const DISAMBIGUATION_WEIGHT: f64 = 0.4;

const CUSP_KEY: &str = "Integral";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralClarificationOutcome {
    pub detail: IntegralDetail,
    pub preliminary: LevelDistribution,
    pub votes: BTreeMap<IntegralLevel, f64>,
    pub turns: usize,
    pub skipped: bool,
}

pub struct IntegralCuspSubject {
    settings: ClarificationSettings,
    dominant: DominantTraits,
    weights: IntegralWeights,
    preliminary: LevelDistribution,
    votes: BTreeMap<IntegralLevel, f64>,
}

impl IntegralCuspSubject {
    pub fn new(
        settings: ClarificationSettings,
        dominant: DominantTraits,
        weights: IntegralWeights,
    ) -> Self {
        Self {
            settings,
            dominant,
            weights,
            preliminary: LevelDistribution::uniform(),
            votes: BTreeMap::new(),
        }
    }

    /// Level with the largest positive vote total; the earlier level wins a tie.
    fn voted_level(&self) -> Option<IntegralLevel> {
        let mut best: Option<(IntegralLevel, f64)> = None;
        for (&level, &votes) in &self.votes {
            if votes > 0.0 && best.is_none_or(|(_, top)| votes > top) {
                best = Some((level, votes));
            }
        }
        best.map(|(level, _)| level)
    }
}

fn parse_level(name: &str) -> Option<IntegralLevel> {
    let name = name.trim();
    IntegralLevel::ALL
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(name))
}

impl ClarificationSubject for IntegralCuspSubject {
    type Input = LevelDistribution;
    type Outcome = IntegralClarificationOutcome;

    fn label(&self) -> &'static str {
        "integral"
    }

    fn analyze(&mut self, distribution: LevelDistribution) -> CuspAnalysis {
        self.votes.clear();
        let ranked = distribution.ranked();
        self.preliminary = distribution;

        let (Some(&(_, top)), Some(&(_, runner_up))) = (ranked.first(), ranked.get(1)) else {
            return CuspAnalysis::default();
        };
        let margin = self.settings.integral_margin;
        let spread = top - runner_up;
        let questions = self.settings.integral_questions.min(MAX_CLARIFY_QUESTIONS);
        if spread >= margin || questions == 0 {
            return CuspAnalysis::default();
        }

        let candidates = ranked
            .iter()
            .filter(|(_, share)| top - share < margin)
            .map(|(level, share)| Candidate {
                name: level.as_str().to_string(),
                description: level.theme().to_string(),
                score: *share,
                keywords: questions::level_keywords(*level)
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
            })
            .collect();

        CuspAnalysis {
            cusps: vec![Cusp {
                key: CUSP_KEY.to_string(),
                candidates,
                spread,
            }],
            plan: vec![0; questions],
        }
    }

    fn apply(&mut self, _cusp: &Cusp, chosen: &str, confidence: f64) -> BTreeMap<String, f64> {
        let Some(level) = parse_level(chosen) else {
            tracing::warn!(candidate = chosen, "Not an Integral level, vote ignored");
            return BTreeMap::new();
        };
        let vote = confidence.clamp(0.0, 1.0);
        *self.votes.entry(level).or_insert(0.0) += vote;
        BTreeMap::from([(level.as_str().to_string(), vote)])
    }

    fn finish(&mut self, turns: usize, skipped: bool) -> IntegralClarificationOutcome {
        let distribution = match self.voted_level() {
            Some(level) => {
                tracing::info!(level = %level, "Blending clarified Integral level");
                self.preliminary.blend_toward(level, DISAMBIGUATION_WEIGHT)
            }
            None => self.preliminary.clone(),
        };
        IntegralClarificationOutcome {
            detail: IntegralDetail::from_distribution(distribution, &self.dominant, &self.weights),
            preliminary: self.preliminary.clone(),
            votes: self.votes.clone(),
            turns,
            skipped,
        }
    }

    fn fallback_question(&self, _cusp: &Cusp, index: usize) -> String {
        questions::integral_question(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Orange and Green 0.01 apart, everything else well behind.
    fn close_call() -> LevelDistribution {
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

    fn subject() -> IntegralCuspSubject {
        IntegralCuspSubject::new(
            ClarificationSettings::default(),
            DominantTraits::new(),
            IntegralWeights::default(),
        )
    }

    #[test]
    fn close_levels_form_one_cusp() {
        let analysis = subject().analyze(close_call());
        assert_eq!(analysis.plan, vec![0, 0, 0]);
        let names: Vec<&str> = analysis.cusps[0]
            .candidates
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Orange", "Green"]);
    }

    #[test]
    fn question_count_is_capped() {
        let settings = ClarificationSettings {
            integral_questions: usize::MAX,
            ..ClarificationSettings::default()
        };
        let mut subject =
            IntegralCuspSubject::new(settings, DominantTraits::new(), IntegralWeights::default());
        let analysis = subject.analyze(close_call());
        assert_eq!(analysis.plan.len(), MAX_CLARIFY_QUESTIONS);
    }

    #[test]
    fn clear_leader_has_no_cusp() {
        let dist = LevelDistribution::normalized([(IntegralLevel::Blue, 1.0)]);
        assert!(subject().analyze(dist).is_empty());
    }

    #[test]
    fn votes_pick_primary_and_blend() {
        let mut subject = subject();
        let analysis = subject.analyze(close_call());
        let cusp = &analysis.cusps[0];
        subject.apply(cusp, "green", 0.9);
        subject.apply(cusp, "Orange", 0.3);
        subject.apply(cusp, "Green", 0.6);

        let outcome = subject.finish(3, false);
        assert_eq!(outcome.detail.primary_level, IntegralLevel::Green);
        assert_eq!(outcome.detail.secondary_level, IntegralLevel::Orange);
        assert!((outcome.detail.distribution.total() - 1.0).abs() < 1e-9);
        let green = outcome.detail.distribution.share(IntegralLevel::Green);
        let expected = 0.6 * outcome.preliminary.share(IntegralLevel::Green) + 0.4;
        assert!((green - expected).abs() < 1e-9);
    }

    #[test]
    fn no_votes_keeps_preliminary() {
        let mut subject = subject();
        let prelim = close_call();
        subject.analyze(prelim.clone());
        let outcome = subject.finish(0, true);
        assert_eq!(outcome.detail.distribution, prelim);
        assert_eq!(outcome.detail.primary_level, IntegralLevel::Orange);
        assert!(outcome.skipped);
    }

    #[test]
    fn unknown_level_is_ignored() {
        let mut subject = subject();
        let analysis = subject.analyze(close_call());
        assert!(subject.apply(&analysis.cusps[0], "Ultraviolet", 1.0).is_empty());
        assert!(subject.votes.is_empty());
    }
}
