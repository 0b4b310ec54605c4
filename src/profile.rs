//! Personality profile assembly.
//!
//! A [`PersonalityProfile`] is everything computed for one completed
//! assessment. It is stamped with the scoring version that produced its
//! framework mappings so profiles scored by older mapping logic can be
//! found and recalculated from their stored trait data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::error::ValidationError;
use crate::mapping::{EnhancedMappingProvider, FrameworkMappings, MappingWarning, map_frameworks};
use crate::scoring::{
    DomainScores, DominantTraits, ResponseVector, TraitAdjustments, TraitScores,
    calculate_domain_scores, calculate_trait_scores, dominant_traits,
};

/// Version of the mapping logic. Bump whenever a mapper's output can change.
pub const SCORING_VERSION: &str = "2.1.0";

fn current_version() -> Version {
    Version::new(2, 1, 0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub id: Uuid,
    pub trait_scores: TraitScores,
    pub dominant_traits: DominantTraits,
    pub domain_scores: DomainScores,
    pub mappings: FrameworkMappings,
    /// Traits the mappers had to substitute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MappingWarning>,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl PersonalityProfile {
    /// True when `version` is older than [`SCORING_VERSION`] or not a
    /// version at all.
    pub fn needs_migration(&self) -> bool {
        match Version::parse(&self.version) {
            Ok(version) => version < current_version(),
            Err(e) => {
                tracing::debug!(version = %self.version, error = %e, "Unparsable profile version");
                true
            }
        }
    }
}

/// Runs the scoring pipeline with one fixed configuration.
#[derive(Clone)]
pub struct ProfileAssembler {
    config: Arc<ScoringConfig>,
    enhanced: Option<Arc<dyn EnhancedMappingProvider>>,
}

impl ProfileAssembler {
    pub fn new(config: Arc<ScoringConfig>) -> Self {
        Self {
            config,
            enhanced: None,
        }
    }

    /// Populate `mappings.enhanced` using `provider`.
    pub fn with_enhanced(mut self, provider: Arc<dyn EnhancedMappingProvider>) -> Self {
        self.enhanced = Some(provider);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Validate `responses` and build a profile from them.
    ///
    /// Validation happens before any scoring: a vector of the wrong length
    /// or with a value outside 1..=10 is rejected outright.
    pub fn generate_full_profile(
        &self,
        responses: &[i64],
    ) -> Result<PersonalityProfile, ValidationError> {
        let responses = ResponseVector::new(responses)?;
        let scores = calculate_trait_scores(&responses, &self.config);
        Ok(self.profile_from_scores(scores))
    }

    /// Like [`generate_full_profile`](Self::generate_full_profile), with
    /// clarification deltas applied (and clamped) before mapping.
    pub fn generate_full_profile_with_adjusted_scores(
        &self,
        responses: &[i64],
        adjustments: &TraitAdjustments,
    ) -> Result<PersonalityProfile, ValidationError> {
        let responses = ResponseVector::new(responses)?;
        let scores = calculate_trait_scores(&responses, &self.config).with_adjustments(adjustments);
        Ok(self.profile_from_scores(scores))
    }

    /// Build a profile from already computed trait scores.
    pub fn profile_from_scores(&self, trait_scores: TraitScores) -> PersonalityProfile {
        let dominant_traits = dominant_traits(&trait_scores);
        let domain_scores = calculate_domain_scores(&trait_scores);
        let mapped = map_frameworks(
            &trait_scores,
            &dominant_traits,
            &self.config,
            self.enhanced.as_deref(),
        );

        let profile = PersonalityProfile {
            id: Uuid::new_v4(),
            trait_scores,
            dominant_traits,
            domain_scores,
            mappings: mapped.value,
            warnings: mapped.warnings,
            timestamp: Utc::now(),
            version: SCORING_VERSION.to_string(),
        };
        tracing::info!(
            id = %profile.id,
            mbti = %profile.mappings.mbti,
            warnings = profile.warnings.len(),
            "Profile generated"
        );
        profile
    }

    /// Re-run only the framework mappers over the stored trait and
    /// dominant-trait data. Keeps the id and stored scores; replaces the
    /// mappings, warnings, timestamp and version.
    pub fn recalculate_profile(&self, profile: &PersonalityProfile) -> PersonalityProfile {
        let mapped = map_frameworks(
            &profile.trait_scores,
            &profile.dominant_traits,
            &self.config,
            self.enhanced.as_deref(),
        );
        tracing::debug!(id = %profile.id, from = %profile.version, "Profile recalculated");
        PersonalityProfile {
            id: profile.id,
            trait_scores: profile.trait_scores.clone(),
            dominant_traits: profile.dominant_traits.clone(),
            domain_scores: profile.domain_scores.clone(),
            mappings: mapped.value,
            warnings: mapped.warnings,
            timestamp: Utc::now(),
            version: SCORING_VERSION.to_string(),
        }
    }

    /// Recalculate `profile` in place if its version is stale. Returns
    /// whether anything changed.
    pub fn migrate(&self, profile: &mut PersonalityProfile) -> bool {
        if !profile.needs_migration() {
            return false;
        }
        let old_version = profile.version.clone();
        *profile = self.recalculate_profile(profile);
        tracing::info!(id = %profile.id, from = %old_version, to = SCORING_VERSION, "Profile migrated");
        true
    }
}
