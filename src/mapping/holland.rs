//! Holland (RIASEC) occupational code.

use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader, TraitWeight, weights};
use crate::scoring::TraitScores;
use crate::taxonomy::PersonalityTrait as T;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HollandWeights {
    pub realistic: Vec<TraitWeight>,
    pub investigative: Vec<TraitWeight>,
    pub artistic: Vec<TraitWeight>,
    pub social: Vec<TraitWeight>,
    pub enterprising: Vec<TraitWeight>,
    pub conventional: Vec<TraitWeight>,
}

impl Default for HollandWeights {
    fn default() -> Self {
        Self {
            realistic: weights(&[(T::Sensing, 0.375), (T::Grounded, 0.375), (T::Measured, 0.25)]),
            investigative: weights(&[
                (T::Analytical, 0.5),
                (T::Intuitive, 0.25),
                (T::Introverted, 0.25),
            ]),
            artistic: weights(&[
                (T::Innovative, 0.375),
                (T::Expressive, 0.375),
                (T::Spontaneous, 0.25),
            ]),
            social: weights(&[
                (T::Empathetic, 0.375),
                (T::Considerate, 0.375),
                (T::Extraverted, 0.25),
            ]),
            enterprising: weights(&[
                (T::Assertive, 0.375),
                (T::Ambitious, 0.375),
                (T::Direct, 0.25),
            ]),
            conventional: weights(&[
                (T::Structured, 0.375),
                (T::Conventional, 0.375),
                (T::Deliberate, 0.25),
            ]),
        }
    }
}

/// Score of every RIASEC type, strongest first; ties keep RIASEC order.
pub fn holland_ranking(scores: &TraitScores, weights: &HollandWeights) -> Mapped<Vec<(char, f64)>> {
    let mut reader = TraitReader::new(scores, Framework::Holland);
    let mut ranked: Vec<(char, f64)> = [
        ('R', &weights.realistic),
        ('I', &weights.investigative),
        ('A', &weights.artistic),
        ('S', &weights.social),
        ('E', &weights.enterprising),
        ('C', &weights.conventional),
    ]
    .into_iter()
    .map(|(letter, table)| (letter, reader.weighted_sum(table)))
    .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    reader.finish(ranked)
}

/// The three strongest RIASEC letters.
pub fn map_holland(scores: &TraitScores, weights: &HollandWeights) -> Mapped<String> {
    holland_ranking(scores, weights).map(|ranked| ranked.iter().take(3).map(|(c, _)| *c).collect())
}
