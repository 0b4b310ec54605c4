//! Trait scoring, personality-framework mapping and cusp clarification.
//!
//! A questionnaire of 108 Likert answers is reduced to 36 trait scores,
//! resolved into one dominant trait per triad, averaged per domain and
//! mapped onto MBTI, Enneagram, Big Five, D&D alignment, Socionics, Holland
//! and Integral results. When scores leave a choice unstable, the
//! clarification flow asks follow-up questions and adjusts the scores
//! before the profile is finalized.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tps_scoring::{ProfileAssembler, ScoringConfig};
//!
//! let assembler = ProfileAssembler::new(Arc::new(ScoringConfig::default()));
//! let profile = assembler.generate_full_profile(&[5; 108])?;
//! assert_eq!(profile.mappings.alignment, "True Neutral");
//! # Ok::<(), tps_scoring::error::ValidationError>(())
//! ```

pub mod clarify;
pub mod config;
pub mod error;
pub mod llm;
pub mod mapping;
pub mod oracle;
pub mod profile;
pub mod scoring;
pub mod taxonomy;

pub use clarify::{ClarificationFlow, FlowState, IntegralCuspSubject, TraitCuspSubject};
pub use config::{AppConfig, ClarificationSettings, ScoringConfig, ScoringOverrides};
pub use mapping::{FrameworkMappings, map_frameworks};
pub use oracle::{ClarificationOracle, LlmClarificationOracle};
pub use profile::{PersonalityProfile, ProfileAssembler, SCORING_VERSION};
pub use scoring::{ResponseVector, TraitAdjustments, TraitScores};
pub use taxonomy::{Domain, PersonalityTrait, TRIADS, Triad};
