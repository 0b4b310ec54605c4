//! Trait scores to personality-framework results.
//!
//! Every mapper is a fixed weighted combination of named trait scores. A
//! mapper never fails on a partially populated score map: an absent trait
//! reads as the neutral 5.0, is logged, and is reported back as a
//! [`MappingWarning`] alongside the result.

pub mod alignment;
pub mod archetype;
pub mod big_five;
pub mod enhanced;
pub mod enneagram;
pub mod holland;
pub mod integral;
pub mod mbti;
pub mod socionics;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::scoring::{DominantTraits, TraitScores};
use crate::taxonomy::{NEUTRAL_SCORE, PersonalityTrait};

pub use alignment::{AlignmentResult, AlignmentWeights, EthicalAxis, MoralAxis, map_alignment};
pub use archetype::{ArchetypeKind, ArchetypeMatch, match_archetypes};
pub use big_five::{BigFiveScores, BigFiveWeights, map_big_five};
pub use enhanced::{DetailedMappings, EnhancedMappingProvider, EnhancedMappings, MappingInput};
pub use enneagram::{EnneagramResult, EnneagramWeights, map_enneagram};
pub use holland::{HollandWeights, map_holland};
pub use integral::{IntegralDetail, IntegralLevel, IntegralWeights, LevelDistribution, Tier};
pub use mbti::{MbtiAxis, MbtiWeights, map_mbti};
pub use socionics::map_socionics;

/// The frameworks trait scores are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framework {
    Mbti,
    Enneagram,
    BigFive,
    Alignment,
    Socionics,
    Holland,
    Archetype,
    Integral,
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mbti => "MBTI",
            Self::Enneagram => "Enneagram",
            Self::BigFive => "Big Five",
            Self::Alignment => "Alignment",
            Self::Socionics => "Socionics",
            Self::Holland => "Holland",
            Self::Archetype => "Archetype",
            Self::Integral => "Integral",
        };
        f.write_str(name)
    }
}

/// One term of a weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitWeight {
    #[serde(rename = "trait")]
    pub name: PersonalityTrait,
    pub weight: f64,
}

/// Build a weight list from `(trait, weight)` pairs.
pub fn weights(pairs: &[(PersonalityTrait, f64)]) -> Vec<TraitWeight> {
    pairs
        .iter()
        .map(|&(name, weight)| TraitWeight { name, weight })
        .collect()
}

/// A trait a mapper needed but did not find; 5.0 was used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingWarning {
    pub framework: Framework,
    pub missing_trait: PersonalityTrait,
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: trait {} missing, substituted {NEUTRAL_SCORE}",
            self.framework, self.missing_trait
        )
    }
}

/// A mapper result together with any substitutions made while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<T> {
    pub value: T,
    pub warnings: Vec<MappingWarning>,
}

impl<T> Mapped<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mapped<U> {
        Mapped {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Move this result's warnings into `sink` and return the value.
    pub fn drain_into(self, sink: &mut Vec<MappingWarning>) -> T {
        for warning in self.warnings {
            if !sink.contains(&warning) {
                sink.push(warning);
            }
        }
        self.value
    }
}

/// Reads trait scores for one framework, recording neutral substitutions.
pub(crate) struct TraitReader<'a> {
    scores: &'a TraitScores,
    framework: Framework,
    warnings: Vec<MappingWarning>,
}

impl<'a> TraitReader<'a> {
    pub(crate) fn new(scores: &'a TraitScores, framework: Framework) -> Self {
        Self {
            scores,
            framework,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn score(&mut self, t: PersonalityTrait) -> f64 {
        if let Some(score) = self.scores.get(t) {
            return score;
        }
        let warning = MappingWarning {
            framework: self.framework,
            missing_trait: t,
        };
        if !self.warnings.contains(&warning) {
            tracing::warn!(
                framework = %self.framework,
                trait_name = %t,
                "Trait score missing, substituting neutral {NEUTRAL_SCORE}"
            );
            self.warnings.push(warning);
        }
        NEUTRAL_SCORE
    }

    pub(crate) fn weighted_sum(&mut self, terms: &[TraitWeight]) -> f64 {
        terms.iter().map(|w| w.weight * self.score(w.name)).sum()
    }

    pub(crate) fn finish<T>(self, value: T) -> Mapped<T> {
        Mapped {
            value,
            warnings: self.warnings,
        }
    }
}

/// Every framework result for one score map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkMappings {
    /// Four-letter type code.
    pub mbti: String,
    pub enneagram: EnneagramResult,
    pub big_five: BigFiveScores,
    /// `"<Ethical> <Moral>"`, or `"True Neutral"`.
    pub alignment: String,
    pub socionics: String,
    /// Three RIASEC letters, strongest first.
    pub holland: String,
    pub archetypes: Vec<ArchetypeMatch>,
    /// Present only when an enhanced provider is installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<EnhancedMappings>,
}

/// Run every mapper, plus the enhanced provider when one is given.
pub fn map_frameworks(
    scores: &TraitScores,
    dominant: &DominantTraits,
    config: &ScoringConfig,
    enhanced: Option<&dyn EnhancedMappingProvider>,
) -> Mapped<FrameworkMappings> {
    let mut warnings = Vec::new();

    let mbti = map_mbti(scores, &config.mbti).drain_into(&mut warnings);
    let socionics = map_socionics(&mbti);
    let mut mappings = FrameworkMappings {
        enneagram: map_enneagram(scores, &config.enneagram).drain_into(&mut warnings),
        big_five: map_big_five(scores, &config.big_five).drain_into(&mut warnings),
        alignment: map_alignment(scores, &config.alignment)
            .drain_into(&mut warnings)
            .to_string(),
        holland: map_holland(scores, &config.holland).drain_into(&mut warnings),
        archetypes: match_archetypes(scores).drain_into(&mut warnings),
        mbti,
        socionics,
        enhanced: None,
    };

    if let Some(provider) = enhanced {
        let input = MappingInput {
            scores,
            dominant,
            config,
            base: &mappings,
        };
        let detail = provider.enhance(&input).drain_into(&mut warnings);
        tracing::debug!(provider = provider.name(), "Enhanced mappings computed");
        mappings.enhanced = Some(detail);
    }

    Mapped {
        value: mappings,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::dominant_traits;

    fn uniform(score: f64) -> TraitScores {
        PersonalityTrait::ALL.iter().map(|t| (*t, score)).collect()
    }

    #[test]
    fn reader_warns_once_per_trait() {
        let scores = TraitScores::new();
        let mut reader = TraitReader::new(&scores, Framework::Holland);
        assert_eq!(reader.score(PersonalityTrait::Direct), 5.0);
        assert_eq!(reader.score(PersonalityTrait::Direct), 5.0);
        let mapped = reader.finish(());
        assert_eq!(
            mapped.warnings,
            vec![MappingWarning {
                framework: Framework::Holland,
                missing_trait: PersonalityTrait::Direct,
            }]
        );
    }

    #[test]
    fn full_scores_produce_no_warnings() {
        let scores = uniform(6.0);
        let dominant = dominant_traits(&scores);
        let mapped = map_frameworks(&scores, &dominant, &ScoringConfig::default(), None);
        assert!(mapped.warnings.is_empty());
        assert!(mapped.value.enhanced.is_none());
    }

    #[test]
    fn empty_scores_map_without_panicking() {
        let scores = TraitScores::new();
        let dominant = dominant_traits(&scores);
        let mapped = map_frameworks(
            &scores,
            &dominant,
            &ScoringConfig::default(),
            Some(&DetailedMappings),
        );
        assert_eq!(mapped.value.mbti.len(), 4);
        assert_eq!(mapped.value.alignment, "True Neutral");
        assert!(mapped.value.enhanced.is_some());
        assert!(!mapped.warnings.is_empty());
        let mut unique = mapped.warnings.clone();
        unique.dedup();
        assert_eq!(unique.len(), mapped.warnings.len());
    }

    #[test]
    fn warning_display_names_framework_and_trait() {
        let warning = MappingWarning {
            framework: Framework::Alignment,
            missing_trait: PersonalityTrait::Skeptical,
        };
        assert_eq!(
            warning.to_string(),
            "Alignment: trait Skeptical missing, substituted 5"
        );
    }
}
