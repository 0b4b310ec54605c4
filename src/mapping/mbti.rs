//! Four-letter MBTI type from weighted trait sums.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader, TraitWeight, weights};
use crate::scoring::TraitScores;
use crate::taxonomy::PersonalityTrait as T;

/// One of the four dichotomies, in letter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MbtiAxis {
    EI,
    SN,
    TF,
    JP,
}

impl MbtiAxis {
    pub const ALL: [Self; 4] = [Self::EI, Self::SN, Self::TF, Self::JP];

    /// `(high, low)`: the letter chosen when the weighted sum exceeds the
    /// threshold, and the one chosen otherwise.
    pub fn letters(self) -> (char, char) {
        match self {
            Self::EI => ('E', 'I'),
            Self::SN => ('N', 'S'),
            Self::TF => ('F', 'T'),
            Self::JP => ('J', 'P'),
        }
    }

    pub fn select(self, weights: &MbtiWeights) -> &AxisWeights {
        match self {
            Self::EI => &weights.ei,
            Self::SN => &weights.sn,
            Self::TF => &weights.tf,
            Self::JP => &weights.jp,
        }
    }
}

impl fmt::Display for MbtiAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EI => "EI",
            Self::SN => "SN",
            Self::TF => "TF",
            Self::JP => "JP",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisWeights {
    pub threshold: f64,
    pub weights: Vec<TraitWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MbtiWeights {
    pub ei: AxisWeights,
    pub sn: AxisWeights,
    pub tf: AxisWeights,
    pub jp: AxisWeights,
}

impl Default for MbtiWeights {
    fn default() -> Self {
        let axis = |pairs: &[(T, f64)]| AxisWeights {
            threshold: 5.0,
            weights: weights(pairs),
        };
        Self {
            ei: axis(&[(T::Extraverted, 0.5), (T::Expressive, 0.25), (T::Assertive, 0.25)]),
            sn: axis(&[(T::Intuitive, 0.5), (T::Innovative, 0.25), (T::Holistic, 0.25)]),
            tf: axis(&[(T::Empathetic, 0.5), (T::Considerate, 0.25), (T::Tactful, 0.25)]),
            jp: axis(&[(T::Structured, 0.5), (T::Deliberate, 0.25), (T::Conventional, 0.25)]),
        }
    }
}

/// The evaluated state of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisResult {
    pub axis: MbtiAxis,
    pub letter: char,
    pub score: f64,
    pub threshold: f64,
}

/// Evaluate all four axes. A letter is the high pole only when its weighted
/// sum is strictly greater than the threshold.
pub fn mbti_axes(scores: &TraitScores, weights: &MbtiWeights) -> Mapped<Vec<AxisResult>> {
    let mut reader = TraitReader::new(scores, Framework::Mbti);
    let axes = MbtiAxis::ALL
        .iter()
        .map(|&axis| {
            let table = axis.select(weights);
            let score = reader.weighted_sum(&table.weights);
            let (high, low) = axis.letters();
            AxisResult {
                axis,
                letter: if score > table.threshold { high } else { low },
                score,
                threshold: table.threshold,
            }
        })
        .collect();
    reader.finish(axes)
}

pub fn map_mbti(scores: &TraitScores, weights: &MbtiWeights) -> Mapped<String> {
    mbti_axes(scores, weights).map(|axes| axes.iter().map(|a| a.letter).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::PersonalityTrait;

    fn uniform(score: f64) -> TraitScores {
        PersonalityTrait::ALL.iter().map(|t| (*t, score)).collect()
    }

    #[test]
    fn neutral_scores_sit_on_the_threshold_and_pick_low_letters() {
        let mapped = map_mbti(&uniform(5.0), &MbtiWeights::default());
        assert_eq!(mapped.value, "ISTP");
        assert!(mapped.warnings.is_empty());
    }

    #[test]
    fn high_scores_pick_high_letters() {
        assert_eq!(map_mbti(&uniform(8.0), &MbtiWeights::default()).value, "ENFJ");
    }

    #[test]
    fn single_axis_moves_independently() {
        let mut scores = uniform(5.0);
        scores.insert(T::Empathetic, 9.0);
        assert_eq!(map_mbti(&scores, &MbtiWeights::default()).value, "ISFP");
    }

    #[test]
    fn threshold_override_flips_letter() {
        let mut weights = MbtiWeights::default();
        weights.ei.threshold = 4.5;
        assert_eq!(map_mbti(&uniform(5.0), &weights).value, "ESTP");
    }

    #[test]
    fn missing_traits_read_neutral_and_warn() {
        let mut scores = uniform(5.0);
        scores.remove(T::Tactful);
        let mapped = map_mbti(&scores, &MbtiWeights::default());
        assert_eq!(mapped.value, "ISTP");
        assert_eq!(mapped.warnings.len(), 1);
        assert_eq!(mapped.warnings[0].missing_trait, T::Tactful);
    }

    #[test]
    fn axis_letters_are_high_then_low() {
        assert_eq!(MbtiAxis::SN.letters(), ('N', 'S'));
        assert_eq!(MbtiAxis::JP.to_string(), "JP");
    }
}
