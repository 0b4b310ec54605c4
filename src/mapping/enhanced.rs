//! Optional detail objects layered over the base framework results.
//!
//! The profile assembler is handed an [`EnhancedMappingProvider`] at
//! construction time, or none at all. With a provider every profile carries
//! an [`EnhancedMappings`] value; without one that field is absent.

use serde::{Deserialize, Serialize};

use super::enneagram::{Center, enneagram_scores, resolve};
use super::holland::holland_ranking;
use super::integral::map_integral;
use super::mbti::{MbtiAxis, mbti_axes};
use super::{FrameworkMappings, IntegralDetail, Mapped, map_big_five};
use crate::config::ScoringConfig;
use crate::scoring::{DominantTraits, TraitScores};
use crate::taxonomy::{MAX_SCORE, MIN_SCORE};

/// Everything a provider may look at.
pub struct MappingInput<'a> {
    pub scores: &'a TraitScores,
    pub dominant: &'a DominantTraits,
    pub config: &'a ScoringConfig,
    pub base: &'a FrameworkMappings,
}

/// Computes the detailed per-framework breakdowns.
pub trait EnhancedMappingProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn enhance(&self, input: &MappingInput<'_>) -> Mapped<EnhancedMappings>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedMappings {
    pub mbti: MbtiDetail,
    pub enneagram: EnneagramDetail,
    pub big_five: Vec<BigFiveFactor>,
    pub holland: Vec<HollandRank>,
    pub integral: IntegralDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDetail {
    pub axis: MbtiAxis,
    pub letter: char,
    pub score: f64,
    pub threshold: f64,
    /// Distance from the threshold, scaled to 0..=1.
    pub clarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MbtiDetail {
    pub axes: Vec<AxisDetail>,
    /// Dominant, auxiliary, tertiary, inferior. Empty for an unrecognised code.
    pub cognitive_stack: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnneagramTypeScore {
    pub type_number: u8,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnneagramDetail {
    pub scores: Vec<EnneagramTypeScore>,
    pub center: Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorLevel {
    Low,
    Moderate,
    High,
}

impl FactorLevel {
    pub fn of(score: f64) -> Self {
        if score < 4.0 {
            Self::Low
        } else if score > 7.0 {
            Self::High
        } else {
            Self::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigFiveFactor {
    pub factor: String,
    pub score: f64,
    pub level: FactorLevel,
    pub percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HollandRank {
    pub code: char,
    pub score: f64,
}

/// Jungian function stack for a four-letter code, e.g. `ISTP` gives
/// `Ti Se Ni Fe`.
pub fn cognitive_stack(code: &str) -> Option<[String; 4]> {
    let letters: Vec<char> = code.chars().collect();
    let &[attitude, perceiving, judging, lifestyle] = letters.as_slice() else {
        return None;
    };
    let opposite = |c: char| match c {
        'S' => Some('N'),
        'N' => Some('S'),
        'T' => Some('F'),
        'F' => Some('T'),
        _ => None,
    };
    if !matches!(attitude, 'E' | 'I')
        || !matches!(perceiving, 'S' | 'N')
        || !matches!(judging, 'T' | 'F')
        || !matches!(lifestyle, 'J' | 'P')
    {
        return None;
    }

    // J/P names the function shown to the outer world.
    let (extraverted, introverted) = if lifestyle == 'J' {
        (judging, perceiving)
    } else {
        (perceiving, judging)
    };
    let (dominant, dom_attitude, auxiliary, aux_attitude) = if attitude == 'E' {
        (extraverted, 'e', introverted, 'i')
    } else {
        (introverted, 'i', extraverted, 'e')
    };
    Some([
        format!("{dominant}{dom_attitude}"),
        format!("{auxiliary}{aux_attitude}"),
        format!("{}{dom_attitude}", opposite(auxiliary)?),
        format!("{}{aux_attitude}", opposite(dominant)?),
    ])
}

/// The built-in provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailedMappings;

impl EnhancedMappingProvider for DetailedMappings {
    fn name(&self) -> &'static str {
        "detailed"
    }

    fn enhance(&self, input: &MappingInput<'_>) -> Mapped<EnhancedMappings> {
        let mut warnings = Vec::new();
        let config = input.config;
        let range = MAX_SCORE - MIN_SCORE;

        let axes = mbti_axes(input.scores, &config.mbti)
            .drain_into(&mut warnings)
            .into_iter()
            .map(|a| AxisDetail {
                axis: a.axis,
                letter: a.letter,
                score: a.score,
                threshold: a.threshold,
                clarity: ((a.score - a.threshold).abs() / 5.0).clamp(0.0, 1.0),
            })
            .collect();
        let cognitive_stack = cognitive_stack(&input.base.mbti)
            .map(Vec::from)
            .unwrap_or_default();

        let type_scores = enneagram_scores(input.scores, &config.enneagram).drain_into(&mut warnings);
        let primary = resolve(&type_scores).primary;
        let enneagram = EnneagramDetail {
            scores: (1..=9u8)
                .zip(type_scores)
                .map(|(type_number, score)| EnneagramTypeScore { type_number, score })
                .collect(),
            center: Center::of(primary),
        };

        let big_five = map_big_five(input.scores, &config.big_five)
            .drain_into(&mut warnings)
            .factors()
            .into_iter()
            .map(|(factor, score)| BigFiveFactor {
                factor: factor.to_string(),
                score,
                level: FactorLevel::of(score),
                percentile: ((score - MIN_SCORE) / range * 100.0).clamp(0.0, 100.0),
            })
            .collect();

        let holland = holland_ranking(input.scores, &config.holland)
            .drain_into(&mut warnings)
            .into_iter()
            .map(|(code, score)| HollandRank { code, score })
            .collect();

        let integral = map_integral(input.scores, input.dominant, &config.integral).drain_into(&mut warnings);

        Mapped {
            value: EnhancedMappings {
                mbti: MbtiDetail {
                    axes,
                    cognitive_stack,
                },
                enneagram,
                big_five,
                holland,
                integral,
            },
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::map_frameworks;
    use crate::scoring::dominant_traits;
    use crate::taxonomy::PersonalityTrait;

    #[test]
    fn stacks_for_known_types() {
        assert_eq!(
            cognitive_stack("ISTP").map(|s| s.join(" ")).as_deref(),
            Some("Ti Se Ni Fe")
        );
        assert_eq!(
            cognitive_stack("ENFJ").map(|s| s.join(" ")).as_deref(),
            Some("Fe Ni Se Ti")
        );
        assert_eq!(
            cognitive_stack("INTJ").map(|s| s.join(" ")).as_deref(),
            Some("Ni Te Fi Se")
        );
        assert_eq!(
            cognitive_stack("ESFP").map(|s| s.join(" ")).as_deref(),
            Some("Se Fi Te Ni")
        );
    }

    #[test]
    fn malformed_codes_have_no_stack() {
        assert!(cognitive_stack("ISTPX").is_none());
        assert!(cognitive_stack("XSTP").is_none());
        assert!(cognitive_stack("ITSP").is_none());
        assert!(cognitive_stack("").is_none());
    }

    #[test]
    fn factor_levels_use_open_bounds() {
        assert_eq!(FactorLevel::of(3.99), FactorLevel::Low);
        assert_eq!(FactorLevel::of(4.0), FactorLevel::Moderate);
        assert_eq!(FactorLevel::of(7.0), FactorLevel::Moderate);
        assert_eq!(FactorLevel::of(7.01), FactorLevel::High);
    }

    #[test]
    fn detailed_provider_fills_every_section() {
        let scores: TraitScores = PersonalityTrait::ALL.iter().map(|t| (*t, 5.0)).collect();
        let dominant = dominant_traits(&scores);
        let mapped = map_frameworks(
            &scores,
            &dominant,
            &ScoringConfig::default(),
            Some(&DetailedMappings),
        );
        let detail = mapped.value.enhanced.expect("provider installed");
        assert_eq!(detail.mbti.axes.len(), 4);
        assert!(detail.mbti.axes.iter().all(|a| a.clarity == 0.0));
        assert_eq!(detail.mbti.cognitive_stack, vec!["Ti", "Se", "Ni", "Fe"]);
        assert_eq!(detail.enneagram.scores.len(), 9);
        assert_eq!(detail.enneagram.center, Center::Gut);
        assert!(detail.big_five.iter().all(|f| f.level == FactorLevel::Moderate));
        assert!(
            detail
                .big_five
                .iter()
                .all(|f| (f.percentile - 400.0 / 9.0).abs() < 1e-9)
        );
        assert_eq!(detail.holland.len(), 6);
        assert_eq!(detail.integral.primary_level.as_str(), "Beige");
    }
}
