//! Clarifying triads whose leading traits are nearly tied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ClarificationSubject, Cusp, CuspAnalysis, questions};
use crate::config::ClarificationSettings;
use crate::oracle::Candidate;
use crate::scoring::{TraitAdjustments, TraitScores};
use crate::taxonomy::{PersonalityTrait, TRIADS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitClarificationOutcome {
    /// Input scores with the adjustments applied, clamped to [1, 10].
    pub scores: TraitScores,
    pub adjustments: TraitAdjustments,
    pub turns: usize,
    pub skipped: bool,
}

pub struct TraitCuspSubject {
    settings: ClarificationSettings,
    scores: TraitScores,
    adjustments: TraitAdjustments,
}

impl TraitCuspSubject {
    pub fn new(settings: ClarificationSettings) -> Self {
        Self {
            settings,
            scores: TraitScores::new(),
            adjustments: TraitAdjustments::new(),
        }
    }

    /// Add `delta` to the running adjustment of `t`, keeping the total within
    /// the configured bound. Returns the change actually made.
    fn nudge(&mut self, t: PersonalityTrait, delta: f64) -> f64 {
        let bound = self.settings.max_adjustment;
        let entry = self.adjustments.entry(t).or_insert(0.0);
        let before = *entry;
        *entry = (before + delta).clamp(-bound, bound);
        *entry - before
    }
}

/// Cusps in triad order, before sorting and capping.
fn find_cusps(scores: &TraitScores, margin: f64) -> Vec<Cusp> {
    let mut cusps = Vec::new();
    for triad in &TRIADS {
        let mut ranked: Vec<(PersonalityTrait, f64)> = triad
            .traits
            .iter()
            .map(|t| (*t, scores.get_or_neutral(*t)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let top = ranked[0].1;
        let spread = top - ranked[1].1;
        if spread >= margin {
            continue;
        }
        let candidates = ranked
            .iter()
            .filter(|(_, score)| top - score < margin)
            .map(|(t, score)| Candidate {
                name: t.as_str().to_string(),
                description: questions::trait_description(*t).to_string(),
                score: *score,
                keywords: questions::trait_keywords(*t)
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
            })
            .collect();
        cusps.push(Cusp {
            key: triad.key(),
            candidates,
            spread,
        });
    }
    cusps
}

impl ClarificationSubject for TraitCuspSubject {
    type Input = TraitScores;
    type Outcome = TraitClarificationOutcome;

    fn label(&self) -> &'static str {
        "traits"
    }

    fn analyze(&mut self, scores: TraitScores) -> CuspAnalysis {
        let mut cusps = find_cusps(&scores, self.settings.cusp_margin);
        cusps.sort_by(|a, b| a.spread.total_cmp(&b.spread));
        cusps.truncate(self.settings.max_questions);

        self.scores = scores;
        self.adjustments.clear();

        let plan = (0..cusps.len()).collect();
        CuspAnalysis { cusps, plan }
    }

    fn apply(&mut self, cusp: &Cusp, chosen: &str, confidence: f64) -> BTreeMap<String, f64> {
        let step = self.settings.answer_step * confidence.clamp(0.0, 1.0);
        let mut applied = BTreeMap::new();
        for candidate in &cusp.candidates {
            let Ok(t) = candidate.name.parse::<PersonalityTrait>() else {
                tracing::warn!(candidate = %candidate.name, "Cusp candidate is not a trait");
                continue;
            };
            let delta = if candidate.name.eq_ignore_ascii_case(chosen) {
                step
            } else {
                -step / 2.0
            };
            applied.insert(candidate.name.clone(), self.nudge(t, delta));
        }
        applied
    }

    fn finish(&mut self, turns: usize, skipped: bool) -> TraitClarificationOutcome {
        TraitClarificationOutcome {
            scores: self.scores.with_adjustments(&self.adjustments),
            adjustments: self.adjustments.clone(),
            turns,
            skipped,
        }
    }

    fn fallback_question(&self, cusp: &Cusp, index: usize) -> String {
        questions::trait_question(cusp, index)
    }
}
