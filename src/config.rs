//! Runtime configuration.
//!
//! Environment variables (optionally from a `.env` file) choose the scoring
//! override document, tune the clarification flow, and enable the LLM oracle.

mod helpers;
mod llm;
mod scoring;

use std::path::PathBuf;

use crate::error::ConfigError;

pub(crate) use helpers::{optional_env, parse_optional_env};
pub use llm::LlmConfig;
pub use scoring::{AxisOverride, MbtiOverrides, ScoringConfig, ScoringOverrides};

/// Everything the binary resolves at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `TPS_SCORING_OVERRIDES`: TOML or JSON file merged over the built-in tables.
    pub overrides_path: Option<PathBuf>,
    pub clarification: ClarificationSettings,
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();

        Ok(Self {
            overrides_path: optional_env("TPS_SCORING_OVERRIDES")?.map(PathBuf::from),
            clarification: ClarificationSettings::from_env()?,
            llm: LlmConfig::from_env()?,
        })
    }

    /// Built-in tables, merged with the override file when one is configured.
    pub fn scoring_config(&self) -> Result<ScoringConfig, ConfigError> {
        load_scoring_config(self.overrides_path.as_deref())
    }
}

/// Build a [`ScoringConfig`], applying the override file at `path` if given.
pub fn load_scoring_config(path: Option<&std::path::Path>) -> Result<ScoringConfig, ConfigError> {
    match path {
        Some(path) => ScoringConfig::default().with_overrides(ScoringOverrides::from_file(path)?),
        None => Ok(ScoringConfig::default()),
    }
}

/// Upper bound on either question count.
pub const MAX_CLARIFY_QUESTIONS: usize = 20;

/// Tuning for the cusp clarification flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ClarificationSettings {
    /// Trait cusp: top two scores of a triad closer than this.
    pub cusp_margin: f64,
    /// Integral cusp: top two level shares closer than this.
    pub integral_margin: f64,
    /// Most trait cusps asked about in one session.
    pub max_questions: usize,
    /// Questions asked about an Integral cusp.
    pub integral_questions: usize,
    /// Score moved per fully confident answer.
    pub answer_step: f64,
    /// Bound on the cumulative adjustment of any one trait.
    pub max_adjustment: f64,
}

impl Default for ClarificationSettings {
    fn default() -> Self {
        Self {
            cusp_margin: 0.5,
            integral_margin: 0.02,
            max_questions: 5,
            integral_questions: 3,
            answer_step: 0.5,
            max_adjustment: 1.5,
        }
    }
}

impl ClarificationSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let settings = Self {
            cusp_margin: parse_optional_env("TPS_CUSP_MARGIN", d.cusp_margin)?,
            integral_margin: parse_optional_env("TPS_INTEGRAL_MARGIN", d.integral_margin)?,
            max_questions: parse_optional_env("TPS_MAX_QUESTIONS", d.max_questions)?,
            integral_questions: parse_optional_env("TPS_INTEGRAL_QUESTIONS", d.integral_questions)?,
            answer_step: parse_optional_env("TPS_ANSWER_STEP", d.answer_step)?,
            max_adjustment: parse_optional_env("TPS_MAX_ADJUSTMENT", d.max_adjustment)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Margins, step and bound must be finite and non-negative. Question
    /// counts may not exceed [`MAX_CLARIFY_QUESTIONS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("TPS_CUSP_MARGIN", self.cusp_margin),
            ("TPS_INTEGRAL_MARGIN", self.integral_margin),
            ("TPS_ANSWER_STEP", self.answer_step),
            ("TPS_MAX_ADJUSTMENT", self.max_adjustment),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{value} must be a non-negative number"),
                });
            }
        }
        for (key, value) in [
            ("TPS_MAX_QUESTIONS", self.max_questions),
            ("TPS_INTEGRAL_QUESTIONS", self.integral_questions),
        ] {
            if value > MAX_CLARIFY_QUESTIONS {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{value} exceeds the limit of {MAX_CLARIFY_QUESTIONS}"),
                });
            }
        }
        Ok(())
    }
}
