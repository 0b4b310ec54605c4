//! Raw responses to trait, dominant-trait and domain scores.
//!
//! Everything here is a pure function of its inputs and the active
//! [`ScoringConfig`](crate::config::ScoringConfig).

mod calculator;
mod domain;
mod dominant;

pub use calculator::{calculate_trait_scores, response_at};
pub use domain::{DomainScores, calculate_domain_scores};
pub use dominant::{DominantTraits, TIE_EPSILON, determine_dominant_trait, dominant_traits};

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::taxonomy::{MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE, PersonalityTrait, RESPONSE_COUNT};

/// Per-trait score deltas produced by clarification.
pub type TraitAdjustments = BTreeMap<PersonalityTrait, f64>;

/// A validated questionnaire answer set: exactly 108 values in 1..=10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct ResponseVector(Vec<u8>);

impl ResponseVector {
    /// Validate raw answers. Length is checked before range.
    pub fn new(values: &[i64]) -> Result<Self, ValidationError> {
        if values.len() != RESPONSE_COUNT {
            return Err(ValidationError::WrongLength {
                expected: RESPONSE_COUNT,
                actual: values.len(),
            });
        }
        let mut validated = Vec::with_capacity(RESPONSE_COUNT);
        for (i, &value) in values.iter().enumerate() {
            if !(1..=10).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    index: i + 1,
                    value,
                });
            }
            validated.push(value as u8);
        }
        Ok(Self(validated))
    }

    /// A vector with the same answer for every item.
    pub fn uniform(value: u8) -> Result<Self, ValidationError> {
        Self::new(&[i64::from(value); RESPONSE_COUNT])
    }
}

impl Deref for ResponseVector {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<i64>> for ResponseVector {
    type Error = ValidationError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(&values)
    }
}

impl From<ResponseVector> for Vec<i64> {
    fn from(responses: ResponseVector) -> Self {
        responses.0.into_iter().map(i64::from).collect()
    }
}

/// Trait name to score. May be partially populated; readers substitute the
/// neutral 5.0 for anything absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitScores(BTreeMap<PersonalityTrait, f64>);

impl TraitScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, t: PersonalityTrait) -> Option<f64> {
        self.0.get(&t).copied()
    }

    /// Score of `t`, or the neutral midpoint when absent.
    pub fn get_or_neutral(&self, t: PersonalityTrait) -> f64 {
        self.get(t).unwrap_or(NEUTRAL_SCORE)
    }

    pub fn insert(&mut self, t: PersonalityTrait, score: f64) -> Option<f64> {
        self.0.insert(t, score)
    }

    pub fn remove(&mut self, t: PersonalityTrait) -> Option<f64> {
        self.0.remove(&t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonalityTrait, f64)> + '_ {
        self.0.iter().map(|(t, s)| (*t, *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add each delta to its trait and clamp the result to [1, 10].
    ///
    /// A delta for a trait with no score starts from the neutral 5.0.
    pub fn with_adjustments(&self, adjustments: &TraitAdjustments) -> Self {
        let mut adjusted = self.clone();
        for (t, delta) in adjustments {
            if !delta.is_finite() {
                tracing::warn!(trait_name = %t, "Ignoring non-finite score adjustment");
                continue;
            }
            let base = adjusted.get_or_neutral(*t);
            adjusted.insert(*t, clamp_score(base + delta));
        }
        adjusted
    }
}

impl FromIterator<(PersonalityTrait, f64)> for TraitScores {
    fn from_iter<I: IntoIterator<Item = (PersonalityTrait, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Clamp to the legal trait-score range.
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}
