//! D&D-style alignment from two opposed axis pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader, TraitWeight, weights};
use crate::scoring::TraitScores;
use crate::taxonomy::PersonalityTrait as T;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentWeights {
    /// An axis leans one way only when that side clears this and beats the other.
    pub threshold: f64,
    pub lawfulness: Vec<TraitWeight>,
    pub chaos: Vec<TraitWeight>,
    pub goodness: Vec<TraitWeight>,
    pub selfishness: Vec<TraitWeight>,
}

impl Default for AlignmentWeights {
    fn default() -> Self {
        Self {
            threshold: 6.0,
            lawfulness: weights(&[
                (T::Structured, 0.375),
                (T::Conventional, 0.25),
                (T::Deliberate, 0.25),
                (T::Discerning, 0.125),
            ]),
            chaos: weights(&[
                (T::Spontaneous, 0.375),
                (T::Innovative, 0.25),
                (T::Impulsive, 0.25),
                (T::Skeptical, 0.125),
            ]),
            goodness: weights(&[
                (T::Empathetic, 0.375),
                (T::Considerate, 0.25),
                (T::Trusting, 0.25),
                (T::Tactful, 0.125),
            ]),
            selfishness: weights(&[
                (T::Detached, 0.375),
                (T::Ambitious, 0.25),
                (T::Assertive, 0.25),
                (T::Skeptical, 0.125),
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EthicalAxis {
    Lawful,
    Neutral,
    Chaotic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoralAxis {
    Good,
    Neutral,
    Evil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub ethical: EthicalAxis,
    pub moral: MoralAxis,
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ethical = match self.ethical {
            EthicalAxis::Lawful => "Lawful",
            EthicalAxis::Neutral => "Neutral",
            EthicalAxis::Chaotic => "Chaotic",
        };
        let moral = match self.moral {
            MoralAxis::Good => "Good",
            MoralAxis::Neutral => "Neutral",
            MoralAxis::Evil => "Evil",
        };
        if self.ethical == EthicalAxis::Neutral && self.moral == MoralAxis::Neutral {
            f.write_str("True Neutral")
        } else {
            write!(f, "{ethical} {moral}")
        }
    }
}

/// Which side of an opposed pair wins, if either.
fn lean(first: f64, second: f64, threshold: f64) -> Option<bool> {
    if first > threshold && first > second {
        Some(true)
    } else if second > threshold && second > first {
        Some(false)
    } else {
        None
    }
}

pub fn map_alignment(scores: &TraitScores, weights: &AlignmentWeights) -> Mapped<AlignmentResult> {
    let mut reader = TraitReader::new(scores, Framework::Alignment);
    let law = reader.weighted_sum(&weights.lawfulness);
    let chaos = reader.weighted_sum(&weights.chaos);
    let good = reader.weighted_sum(&weights.goodness);
    let evil = reader.weighted_sum(&weights.selfishness);

    let ethical = match lean(law, chaos, weights.threshold) {
        Some(true) => EthicalAxis::Lawful,
        Some(false) => EthicalAxis::Chaotic,
        None => EthicalAxis::Neutral,
    };
    let moral = match lean(good, evil, weights.threshold) {
        Some(true) => MoralAxis::Good,
        Some(false) => MoralAxis::Evil,
        None => MoralAxis::Neutral,
    };
    reader.finish(AlignmentResult { ethical, moral })
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::taxonomy::PersonalityTrait;

    fn uniform(score: f64) -> TraitScores {
        PersonalityTrait::ALL.iter().map(|t| (*t, score)).collect()
    }

    #[test]
    fn neutral_scores_are_true_neutral() {
        let mapped = map_alignment(&uniform(5.0), &AlignmentWeights::default());
        assert_eq!(mapped.value.to_string(), "True Neutral");
    }

    #[test]
    fn high_everything_cancels_out() {
        let mapped = map_alignment(&uniform(9.0), &AlignmentWeights::default());
        assert_eq!(mapped.value.to_string(), "True Neutral");
    }

    #[test]
    fn lawful_good_profile() {
        let mut scores = uniform(5.0);
        for t in [
            T::Structured,
            T::Conventional,
            T::Deliberate,
            T::Empathetic,
            T::Considerate,
            T::Trusting,
        ] {
            scores.insert(t, 9.0);
        }
        let mapped = map_alignment(&scores, &AlignmentWeights::default());
        assert_eq!(mapped.value.to_string(), "Lawful Good");
    }

    #[test]
    fn chaotic_neutral_profile() {
        let mut scores = uniform(5.0);
        for t in [T::Spontaneous, T::Innovative, T::Impulsive] {
            scores.insert(t, 10.0);
        }
        let mapped = map_alignment(&scores, &AlignmentWeights::default());
        assert_eq!(mapped.value.to_string(), "Chaotic Neutral");
    }

    #[test]
    fn missing_traits_still_produce_a_label() {
        let mut scores = uniform(9.0);
        scores.remove(T::Skeptical);
        scores.remove(T::Detached);
        scores.remove(T::Ambitious);
        scores.remove(T::Assertive);
        let mapped = map_alignment(&scores, &AlignmentWeights::default());
        // selfishness falls to 5 while goodness stays at 9
        assert_eq!(mapped.value.moral, MoralAxis::Good);
        assert_eq!(mapped.warnings.len(), 4);
    }

    #[test]
    #[traced_test]
    fn empty_scores_log_every_substitution() {
        let mapped = map_alignment(&TraitScores::new(), &AlignmentWeights::default());
        assert_eq!(mapped.value.to_string(), "True Neutral");
        assert_eq!(mapped.warnings.len(), 15);
        assert!(logs_contain("Trait score missing"));
    }
}
