//! Integral / Spiral Dynamics developmental levels.
//!
//! A score map loads onto eight levels through fixed weights. The weighted
//! sums are normalized into a [`LevelDistribution`] whose shares add up to 1,
//! and an [`IntegralDetail`] summarizes that distribution: which level leads,
//! by how much, and how the dominant trait of each triad lines up with the
//! levels.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader, TraitWeight, weights};
use crate::scoring::{DominantTraits, TraitScores};
use crate::taxonomy::PersonalityTrait as T;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntegralLevel {
    Beige,
    Purple,
    Red,
    Blue,
    Orange,
    Green,
    Yellow,
    Turquoise,
}

impl IntegralLevel {
    /// Developmental order.
    pub const ALL: [Self; 8] = [
        Self::Beige,
        Self::Purple,
        Self::Red,
        Self::Blue,
        Self::Orange,
        Self::Green,
        Self::Yellow,
        Self::Turquoise,
    ];

    /// 1 for Beige through 8 for Turquoise.
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    pub fn tier(self) -> Tier {
        match self {
            Self::Yellow | Self::Turquoise => Tier::Second,
            _ => Tier::First,
        }
    }

    pub fn theme(self) -> &'static str {
        match self {
            Self::Beige => "survival",
            Self::Purple => "tribal belonging",
            Self::Red => "power and impulse",
            Self::Blue => "order and duty",
            Self::Orange => "achievement",
            Self::Green => "community and equality",
            Self::Yellow => "integration of systems",
            Self::Turquoise => "holistic awareness",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beige => "Beige",
            Self::Purple => "Purple",
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Orange => "Orange",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Turquoise => "Turquoise",
        }
    }
}

impl fmt::Display for IntegralLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLoading {
    pub level: IntegralLevel,
    pub weights: Vec<TraitWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralWeights {
    pub levels: Vec<LevelLoading>,
}

impl IntegralWeights {
    pub fn loading(&self, level: IntegralLevel) -> &[TraitWeight] {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .map(|l| l.weights.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for IntegralWeights {
    fn default() -> Self {
        use IntegralLevel::*;
        let level = |level, pairs: &[(T, f64)]| LevelLoading {
            level,
            weights: weights(pairs),
        };
        Self {
            levels: vec![
                level(Beige, &[(T::Sensing, 0.5), (T::Content, 0.25), (T::Impulsive, 0.25)]),
                level(
                    Purple,
                    &[(T::Trusting, 0.375), (T::Conventional, 0.375), (T::Accommodating, 0.25)],
                ),
                level(Red, &[(T::Assertive, 0.375), (T::Impulsive, 0.375), (T::Direct, 0.25)]),
                level(
                    Blue,
                    &[(T::Structured, 0.375), (T::Conventional, 0.375), (T::Deliberate, 0.25)],
                ),
                level(
                    Orange,
                    &[(T::Ambitious, 0.375), (T::Analytical, 0.375), (T::Adaptive, 0.25)],
                ),
                level(
                    Green,
                    &[(T::Empathetic, 0.375), (T::Considerate, 0.375), (T::Diplomatic, 0.25)],
                ),
                level(
                    Yellow,
                    &[(T::Integrative, 0.375), (T::Measured, 0.375), (T::Adaptive, 0.25)],
                ),
                level(
                    Turquoise,
                    &[(T::Holistic, 0.375), (T::Intuitive, 0.375), (T::Purposeful, 0.25)],
                ),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Share of each level; every level is present and the shares sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelDistribution(BTreeMap<IntegralLevel, f64>);

impl LevelDistribution {
    /// Equal share for every level.
    pub fn uniform() -> Self {
        let share = 1.0 / IntegralLevel::ALL.len() as f64;
        Self(IntegralLevel::ALL.iter().map(|l| (*l, share)).collect())
    }

    /// Build from raw non-negative weights. Negative or non-finite entries
    /// count as zero; a zero total yields the uniform distribution.
    pub fn normalized(raw: impl IntoIterator<Item = (IntegralLevel, f64)>) -> Self {
        let mut values: BTreeMap<IntegralLevel, f64> =
            IntegralLevel::ALL.iter().map(|l| (*l, 0.0)).collect();
        for (level, value) in raw {
            if value.is_finite() && value > 0.0 {
                values.insert(level, value);
            }
        }
        let total: f64 = values.values().sum();
        if total <= 0.0 {
            return Self::uniform();
        }
        for value in values.values_mut() {
            *value /= total;
        }
        Self(values)
    }

    pub fn share(&self, level: IntegralLevel) -> f64 {
        self.0.get(&level).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntegralLevel, f64)> + '_ {
        self.0.iter().map(|(l, s)| (*l, *s))
    }

    /// Levels by share, largest first; equal shares keep developmental order.
    pub fn ranked(&self) -> Vec<(IntegralLevel, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Mix `(1 - weight)` of this distribution with `weight` placed entirely
    /// on `level`, then renormalize.
    pub fn blend_toward(&self, level: IntegralLevel, weight: f64) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        Self::normalized(self.iter().map(|(l, share)| {
            let one_hot = if l == level { 1.0 } else { 0.0 };
            (l, (1.0 - weight) * share + weight * one_hot)
        }))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Normalized weighted sums of the default (or overridden) loadings.
pub fn preliminary_distribution(
    scores: &TraitScores,
    weights: &IntegralWeights,
) -> Mapped<LevelDistribution> {
    let mut reader = TraitReader::new(scores, Framework::Integral);
    let raw: Vec<(IntegralLevel, f64)> = IntegralLevel::ALL
        .iter()
        .map(|&level| (level, reader.weighted_sum(weights.loading(level))))
        .collect();
    reader.finish(LevelDistribution::normalized(raw))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralDetail {
    pub primary_level: IntegralLevel,
    pub secondary_level: IntegralLevel,
    /// Primary share minus secondary share.
    pub confidence: f64,
    /// Share-weighted mean ordinal, 1 to 8.
    pub cognitive_complexity: f64,
    pub tier: Tier,
    /// Triad key to the level its dominant trait loads most heavily.
    pub triad_mapping: BTreeMap<String, IntegralLevel>,
    pub distribution: LevelDistribution,
}

impl IntegralDetail {
    pub fn from_distribution(
        distribution: LevelDistribution,
        dominant: &DominantTraits,
        weights: &IntegralWeights,
    ) -> Self {
        let ranked = distribution.ranked();
        let (primary_level, primary_share) = ranked
            .first()
            .copied()
            .unwrap_or((IntegralLevel::Beige, 0.0));
        let (secondary_level, secondary_share) = ranked
            .get(1)
            .copied()
            .unwrap_or((primary_level, primary_share));

        let cognitive_complexity = distribution
            .iter()
            .map(|(level, share)| share * f64::from(level.ordinal()))
            .sum();

        let triad_mapping = dominant
            .iter()
            .filter_map(|(key, t)| heaviest_level(*t, weights).map(|level| (key.clone(), level)))
            .collect();

        Self {
            primary_level,
            secondary_level,
            confidence: primary_share - secondary_share,
            cognitive_complexity,
            tier: primary_level.tier(),
            triad_mapping,
            distribution,
        }
    }
}

/// The level giving `t` its largest positive weight; the earlier level wins a tie.
fn heaviest_level(t: T, weights: &IntegralWeights) -> Option<IntegralLevel> {
    let mut best: Option<(IntegralLevel, f64)> = None;
    for level in IntegralLevel::ALL {
        let weight: f64 = weights
            .loading(level)
            .iter()
            .filter(|w| w.name == t)
            .map(|w| w.weight)
            .sum();
        if weight > 0.0 && best.is_none_or(|(_, w)| weight > w) {
            best = Some((level, weight));
        }
    }
    best.map(|(level, _)| level)
}

/// Preliminary detail straight from trait scores.
pub fn map_integral(
    scores: &TraitScores,
    dominant: &DominantTraits,
    weights: &IntegralWeights,
) -> Mapped<IntegralDetail> {
    preliminary_distribution(scores, weights)
        .map(|distribution| IntegralDetail::from_distribution(distribution, dominant, weights))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::scoring::dominant_traits;
    use crate::taxonomy::PersonalityTrait;

    fn uniform(score: f64) -> TraitScores {
        PersonalityTrait::ALL.iter().map(|t| (*t, score)).collect()
    }

    #[test]
    fn neutral_scores_spread_evenly() {
        let scores = uniform(5.0);
        let detail = map_integral(&scores, &dominant_traits(&scores), &IntegralWeights::default()).value;
        for (_, share) in detail.distribution.iter() {
            assert_eq!(share, 0.125);
        }
        assert_eq!(detail.primary_level, IntegralLevel::Beige);
        assert_eq!(detail.secondary_level, IntegralLevel::Purple);
        assert_eq!(detail.confidence, 0.0);
        assert_eq!(detail.cognitive_complexity, 4.5);
        assert_eq!(detail.tier, Tier::First);
    }

    #[test]
    fn holistic_profile_reaches_second_tier() {
        let mut scores = uniform(4.0);
        for t in [T::Holistic, T::Intuitive, T::Purposeful] {
            scores.insert(t, 10.0);
        }
        let detail = map_integral(&scores, &dominant_traits(&scores), &IntegralWeights::default()).value;
        assert_eq!(detail.primary_level, IntegralLevel::Turquoise);
        assert_eq!(detail.tier, Tier::Second);
        assert!(detail.confidence > 0.0);
    }

    #[test]
    fn distribution_sums_to_one() {
        let mut scores = uniform(3.0);
        scores.insert(T::Assertive, 9.0);
        let dist = preliminary_distribution(&scores, &IntegralWeights::default()).value;
        assert!((dist.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blend_moves_share_toward_level() {
        let dist = LevelDistribution::uniform();
        let blended = dist.blend_toward(IntegralLevel::Green, 0.4);
        assert!((blended.share(IntegralLevel::Green) - (0.6 * 0.125 + 0.4)).abs() < 1e-12);
        assert!((blended.total() - 1.0).abs() < 1e-12);
        assert_eq!(blended.ranked()[0].0, IntegralLevel::Green);
    }

    #[test]
    fn triad_mapping_follows_dominant_loadings() {
        let scores = uniform(5.0);
        let dominant = dominant_traits(&scores);
        let detail = IntegralDetail::from_distribution(
            LevelDistribution::uniform(),
            &dominant,
            &IntegralWeights::default(),
        );
        // middle traits dominate on ties
        assert_eq!(
            detail.triad_mapping.get("External-Control"),
            Some(&IntegralLevel::Green)
        );
        assert_eq!(
            detail.triad_mapping.get("Processing-Decision"),
            Some(&IntegralLevel::Yellow)
        );
        // Ambiverted loads no level
        assert!(!detail.triad_mapping.contains_key("External-Energy"));
    }

    #[test]
    fn empty_loadings_fall_back_to_uniform() {
        let weights = IntegralWeights { levels: Vec::new() };
        let dist = preliminary_distribution(&uniform(5.0), &weights).value;
        assert_eq!(dist, LevelDistribution::uniform());
    }
}
