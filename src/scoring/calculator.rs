use crate::config::ScoringConfig;
use crate::scoring::{TraitScores, clamp_score};
use crate::taxonomy::{NEUTRAL_SCORE, PersonalityTrait};

/// Average each trait's configured items into a score.
///
/// Item numbers are 1-based. An item that does not exist in `responses`
/// (including item 0) reads as the neutral 5 instead of failing, and a trait
/// with no configured items scores 5.
pub fn calculate_trait_scores(responses: &[u8], config: &ScoringConfig) -> TraitScores {
    PersonalityTrait::ALL
        .iter()
        .map(|&t| {
            let indices = config.indices_for(t);
            let score = if indices.is_empty() {
                NEUTRAL_SCORE
            } else {
                let total: f64 = indices.iter().map(|&i| response_at(responses, i)).sum();
                total / indices.len() as f64
            };
            (t, clamp_score(score))
        })
        .collect()
}

/// Response value for a 1-based item number, or 5 when out of range.
pub fn response_at(responses: &[u8], item: usize) -> f64 {
    item.checked_sub(1)
        .and_then(|i| responses.get(i))
        .map(|&v| f64::from(v))
        .unwrap_or(NEUTRAL_SCORE)
}
