//! Enneagram type, wing and tritype.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader, TraitWeight, weights};
use crate::scoring::TraitScores;
use crate::taxonomy::PersonalityTrait as T;

/// The three intelligence centers, each holding three types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Center {
    Heart,
    Head,
    Gut,
}

impl Center {
    /// Tritype order: the primary's center is skipped, the rest are visited
    /// in this order.
    pub const ALL: [Self; 3] = [Self::Heart, Self::Head, Self::Gut];

    pub fn types(self) -> [u8; 3] {
        match self {
            Self::Heart => [2, 3, 4],
            Self::Head => [5, 6, 7],
            Self::Gut => [8, 9, 1],
        }
    }

    pub fn of(type_number: u8) -> Self {
        match type_number {
            2..=4 => Self::Heart,
            5..=7 => Self::Head,
            _ => Self::Gut,
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Heart => "Heart",
            Self::Head => "Head",
            Self::Gut => "Gut",
        };
        f.write_str(name)
    }
}

fn default_divisor() -> f64 {
    5.0
}

/// Per-type weight lists, indexed by `type - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnneagramWeights {
    pub types: [Vec<TraitWeight>; 9],
    #[serde(default = "default_divisor")]
    pub divisor: f64,
}

impl Default for EnneagramWeights {
    fn default() -> Self {
        Self {
            types: [
                weights(&[
                    (T::Structured, 1.5),
                    (T::Conventional, 1.25),
                    (T::Deliberate, 1.0),
                    (T::Direct, 0.75),
                    (T::Composed, 0.5),
                ]),
                weights(&[
                    (T::Empathetic, 1.5),
                    (T::Considerate, 1.25),
                    (T::Accommodating, 1.0),
                    (T::Expressive, 0.75),
                    (T::Trusting, 0.5),
                ]),
                weights(&[
                    (T::Ambitious, 1.5),
                    (T::Assertive, 1.25),
                    (T::Extraverted, 1.0),
                    (T::Adaptive, 0.75),
                    (T::Direct, 0.5),
                ]),
                weights(&[
                    (T::Expressive, 1.5),
                    (T::Intuitive, 1.5),
                    (T::Innovative, 1.0),
                    (T::Introverted, 1.0),
                ]),
                weights(&[
                    (T::Analytical, 1.5),
                    (T::Introverted, 1.25),
                    (T::Detached, 1.0),
                    (T::Deliberate, 0.75),
                    (T::Reserved, 0.5),
                ]),
                weights(&[
                    (T::Skeptical, 1.5),
                    (T::Discerning, 1.25),
                    (T::Conventional, 1.0),
                    (T::Measured, 0.75),
                    (T::Structured, 0.5),
                ]),
                weights(&[
                    (T::Spontaneous, 1.5),
                    (T::Extraverted, 1.25),
                    (T::Innovative, 1.0),
                    (T::Impulsive, 0.75),
                    (T::Expressive, 0.5),
                ]),
                weights(&[
                    (T::Assertive, 1.5),
                    (T::Direct, 1.5),
                    (T::Ambitious, 1.0),
                    (T::Skeptical, 1.0),
                ]),
                weights(&[
                    (T::Accommodating, 1.5),
                    (T::Content, 1.25),
                    (T::Diplomatic, 1.0),
                    (T::Flexible, 0.75),
                    (T::Composed, 0.5),
                ]),
            ],
            divisor: default_divisor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnneagramResult {
    pub primary: u8,
    pub wing: u8,
    /// `"<primary>w<wing>"`.
    pub label: String,
    /// Three digits, one per center, primary first.
    pub tritype: String,
}

/// Score for each type, index `type - 1`.
pub fn enneagram_scores(scores: &TraitScores, weights: &EnneagramWeights) -> Mapped<[f64; 9]> {
    let mut reader = TraitReader::new(scores, Framework::Enneagram);
    let divisor = if weights.divisor.is_finite() && weights.divisor != 0.0 {
        weights.divisor
    } else {
        tracing::warn!(divisor = weights.divisor, "Unusable Enneagram divisor, using 5");
        default_divisor()
    };
    let mut type_scores = [0.0; 9];
    for (slot, table) in type_scores.iter_mut().zip(&weights.types) {
        *slot = reader.weighted_sum(table) / divisor;
    }
    reader.finish(type_scores)
}

fn score_of(type_scores: &[f64; 9], type_number: u8) -> f64 {
    type_scores[usize::from(type_number - 1)]
}

/// Highest-scoring type in `candidates`; the first listed wins a tie.
fn best_of(type_scores: &[f64; 9], candidates: impl IntoIterator<Item = u8>) -> Option<u8> {
    candidates.into_iter().fold(None, |best, n| match best {
        Some(b) if score_of(type_scores, b) >= score_of(type_scores, n) => Some(b),
        _ => Some(n),
    })
}

pub fn neighbours(type_number: u8) -> (u8, u8) {
    let left = if type_number == 1 { 9 } else { type_number - 1 };
    let right = if type_number == 9 { 1 } else { type_number + 1 };
    (left, right)
}

/// Resolve primary, wing and tritype from per-type scores.
pub fn resolve(type_scores: &[f64; 9]) -> EnneagramResult {
    let primary = best_of(type_scores, 1..=9).unwrap_or(1);

    let (left, right) = neighbours(primary);
    let wing = if score_of(type_scores, right) > score_of(type_scores, left) {
        right
    } else {
        left
    };

    let home = Center::of(primary);
    let mut tritype = primary.to_string();
    for center in Center::ALL.into_iter().filter(|c| *c != home) {
        if let Some(best) = best_of(type_scores, center.types()) {
            tritype.push_str(&best.to_string());
        }
    }

    EnneagramResult {
        primary,
        wing,
        label: format!("{primary}w{wing}"),
        tritype,
    }
}

pub fn map_enneagram(scores: &TraitScores, weights: &EnneagramWeights) -> Mapped<EnneagramResult> {
    enneagram_scores(scores, weights).map(|s| resolve(&s))
}
