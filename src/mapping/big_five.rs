use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader, TraitWeight, weights};
use crate::scoring::TraitScores;
use crate::taxonomy::PersonalityTrait as T;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigFiveWeights {
    pub openness: Vec<TraitWeight>,
    pub conscientiousness: Vec<TraitWeight>,
    pub extraversion: Vec<TraitWeight>,
    pub agreeableness: Vec<TraitWeight>,
    pub neuroticism: Vec<TraitWeight>,
}

impl Default for BigFiveWeights {
    fn default() -> Self {
        Self {
            openness: weights(&[
                (T::Innovative, 0.25),
                (T::Intuitive, 0.25),
                (T::Holistic, 0.25),
                (T::Flexible, 0.25),
            ]),
            conscientiousness: weights(&[
                (T::Structured, 0.375),
                (T::Deliberate, 0.25),
                (T::Purposeful, 0.25),
                (T::Conventional, 0.125),
            ]),
            extraversion: weights(&[
                (T::Extraverted, 0.5),
                (T::Expressive, 0.25),
                (T::Assertive, 0.25),
            ]),
            agreeableness: weights(&[
                (T::Empathetic, 0.375),
                (T::Considerate, 0.25),
                (T::Trusting, 0.25),
                (T::Accommodating, 0.125),
            ]),
            neuroticism: weights(&[
                (T::Expressive, 0.25),
                (T::Impulsive, 0.25),
                (T::Skeptical, 0.25),
                (T::Detached, 0.25),
            ]),
        }
    }
}

/// OCEAN factor scores on the 1-10 trait scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigFiveScores {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl BigFiveScores {
    /// `(factor name, score)` in OCEAN order.
    pub fn factors(&self) -> [(&'static str, f64); 5] {
        [
            ("openness", self.openness),
            ("conscientiousness", self.conscientiousness),
            ("extraversion", self.extraversion),
            ("agreeableness", self.agreeableness),
            ("neuroticism", self.neuroticism),
        ]
    }
}

pub fn map_big_five(scores: &TraitScores, weights: &BigFiveWeights) -> Mapped<BigFiveScores> {
    let mut reader = TraitReader::new(scores, Framework::BigFive);
    let value = BigFiveScores {
        openness: reader.weighted_sum(&weights.openness),
        conscientiousness: reader.weighted_sum(&weights.conscientiousness),
        extraversion: reader.weighted_sum(&weights.extraversion),
        agreeableness: reader.weighted_sum(&weights.agreeableness),
        neuroticism: reader.weighted_sum(&weights.neuroticism),
    };
    reader.finish(value)
}
