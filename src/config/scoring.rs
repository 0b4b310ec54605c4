//! Scoring tables and their runtime overrides.
//!
//! [`ScoringConfig`] holds every lookup table the calculators and mappers
//! read: trait-to-item indices plus the weight tables of each framework. It
//! is built once, either from the built-in defaults or from the defaults
//! merged with a [`ScoringOverrides`] document, and then only ever shared.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mapping::alignment::AlignmentWeights;
use crate::mapping::big_five::BigFiveWeights;
use crate::mapping::enneagram::EnneagramWeights;
use crate::mapping::holland::HollandWeights;
use crate::mapping::integral::IntegralWeights;
use crate::mapping::mbti::{AxisWeights, MbtiAxis, MbtiWeights};
use crate::mapping::TraitWeight;
use crate::taxonomy::{PersonalityTrait, default_trait_indices};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// 1-based questionnaire items read for each trait.
    pub trait_indices: BTreeMap<PersonalityTrait, Vec<usize>>,
    pub mbti: MbtiWeights,
    pub enneagram: EnneagramWeights,
    pub big_five: BigFiveWeights,
    pub alignment: AlignmentWeights,
    pub holland: HollandWeights,
    pub integral: IntegralWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trait_indices: default_trait_indices(),
            mbti: MbtiWeights::default(),
            enneagram: EnneagramWeights::default(),
            big_five: BigFiveWeights::default(),
            alignment: AlignmentWeights::default(),
            holland: HollandWeights::default(),
            integral: IntegralWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Items read for `t`; empty when the table has no entry.
    pub fn indices_for(&self, t: PersonalityTrait) -> &[usize] {
        self.trait_indices
            .get(&t)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Apply an overrides document on top of this config.
    ///
    /// Trait index entries replace the entry for that trait only. MBTI axes
    /// are patched per field. Every other table present in the document
    /// replaces the built-in one wholesale.
    pub fn with_overrides(mut self, overrides: ScoringOverrides) -> Result<Self, ConfigError> {
        if let Some(indices) = overrides.trait_indices {
            for (name, items) in indices {
                let t: PersonalityTrait =
                    name.parse().map_err(|e| ConfigError::InvalidValue {
                        key: format!("trait_indices.{name}"),
                        message: format!("{e}"),
                    })?;
                self.trait_indices.insert(t, items);
            }
        }

        if let Some(mbti) = overrides.mbti {
            for axis in MbtiAxis::ALL {
                let Some(patch) = mbti.select(axis) else {
                    continue;
                };
                let target = axis_mut(&mut self.mbti, axis);
                if let Some(threshold) = patch.threshold {
                    target.threshold = threshold;
                }
                if let Some(weights) = &patch.weights {
                    target.weights = weights.clone();
                }
            }
        }

        if let Some(enneagram) = overrides.enneagram {
            self.enneagram = enneagram;
        }
        if let Some(big_five) = overrides.big_five {
            self.big_five = big_five;
        }
        if let Some(alignment) = overrides.alignment {
            self.alignment = alignment;
        }
        if let Some(holland) = overrides.holland {
            self.holland = holland;
        }
        if let Some(integral) = overrides.integral {
            self.integral = integral;
        }

        self.validate()?;
        tracing::debug!("Scoring overrides applied");
        Ok(self)
    }

    /// Every weight and threshold must be a finite number.
    fn validate(&self) -> Result<(), ConfigError> {
        check_finite("alignment.threshold", self.alignment.threshold)?;
        check_finite("enneagram.divisor", self.enneagram.divisor)?;
        for axis in MbtiAxis::ALL {
            let key = format!("mbti.{}", axis.to_string().to_lowercase());
            let table = axis.select(&self.mbti);
            check_finite(&format!("{key}.threshold"), table.threshold)?;
            check_weights(&key, &table.weights)?;
        }
        for (i, table) in self.enneagram.types.iter().enumerate() {
            check_weights(&format!("enneagram.types[{i}]"), table)?;
        }
        let named: [(&str, &Vec<TraitWeight>); 15] = [
            ("big_five.openness", &self.big_five.openness),
            ("big_five.conscientiousness", &self.big_five.conscientiousness),
            ("big_five.extraversion", &self.big_five.extraversion),
            ("big_five.agreeableness", &self.big_five.agreeableness),
            ("big_five.neuroticism", &self.big_five.neuroticism),
            ("alignment.lawfulness", &self.alignment.lawfulness),
            ("alignment.chaos", &self.alignment.chaos),
            ("alignment.goodness", &self.alignment.goodness),
            ("alignment.selfishness", &self.alignment.selfishness),
            ("holland.realistic", &self.holland.realistic),
            ("holland.investigative", &self.holland.investigative),
            ("holland.artistic", &self.holland.artistic),
            ("holland.social", &self.holland.social),
            ("holland.enterprising", &self.holland.enterprising),
            ("holland.conventional", &self.holland.conventional),
        ];
        for (key, table) in named {
            check_weights(key, table)?;
        }
        for loading in &self.integral.levels {
            check_weights(&format!("integral.{}", loading.level), &loading.weights)?;
        }
        Ok(())
    }
}

fn check_weights(key: &str, table: &[TraitWeight]) -> Result<(), ConfigError> {
    for w in table {
        check_finite(&format!("{key}.{}", w.name), w.weight)?;
    }
    Ok(())
}

fn check_finite(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{value} is not a finite number"),
        })
    }
}

fn axis_mut(weights: &mut MbtiWeights, axis: MbtiAxis) -> &mut AxisWeights {
    match axis {
        MbtiAxis::EI => &mut weights.ei,
        MbtiAxis::SN => &mut weights.sn,
        MbtiAxis::TF => &mut weights.tf,
        MbtiAxis::JP => &mut weights.jp,
    }
}

/// Patch for one MBTI axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisOverride {
    pub threshold: Option<f64>,
    pub weights: Option<Vec<TraitWeight>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MbtiOverrides {
    pub ei: Option<AxisOverride>,
    pub sn: Option<AxisOverride>,
    pub tf: Option<AxisOverride>,
    pub jp: Option<AxisOverride>,
}

impl MbtiOverrides {
    fn select(&self, axis: MbtiAxis) -> Option<&AxisOverride> {
        match axis {
            MbtiAxis::EI => self.ei.as_ref(),
            MbtiAxis::SN => self.sn.as_ref(),
            MbtiAxis::TF => self.tf.as_ref(),
            MbtiAxis::JP => self.jp.as_ref(),
        }
    }
}

/// An externally supplied document of table replacements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringOverrides {
    /// Trait name to replacement item list.
    pub trait_indices: Option<BTreeMap<String, Vec<usize>>>,
    pub mbti: Option<MbtiOverrides>,
    pub enneagram: Option<EnneagramWeights>,
    pub big_five: Option<BigFiveWeights>,
    pub alignment: Option<AlignmentWeights>,
    pub holland: Option<HollandWeights>,
    pub integral: Option<IntegralWeights>,
}

impl ScoringOverrides {
    /// Load from a `.toml` file, or JSON for any other extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let overrides = if is_toml {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        tracing::info!(path = %path.display(), "Loaded scoring overrides");
        Ok(overrides)
    }
}
