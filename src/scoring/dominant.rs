use std::collections::BTreeMap;

use crate::scoring::TraitScores;
use crate::taxonomy::{PersonalityTrait, TRIADS};

/// Scores closer than this are treated as tied.
pub const TIE_EPSILON: f64 = 0.01;

/// Triad key (`"<Domain>-<Triad>"`) to its dominant trait.
pub type DominantTraits = BTreeMap<String, PersonalityTrait>;

/// Pick the dominant trait of a triad given in canonical order.
///
/// A unique top score wins. A three-way tie resolves to the middle trait, as
/// does a two-way tie between the first and third (polar) traits. Any other
/// two-way tie goes to the higher-scoring of the pair, or to the one first
/// in triad order when they are exactly equal.
/// Missing scores read as 5.0.
pub fn determine_dominant_trait(
    triad: &[PersonalityTrait; 3],
    scores: &TraitScores,
) -> PersonalityTrait {
    let mut ranked: Vec<(usize, f64)> = triad
        .iter()
        .enumerate()
        .map(|(position, t)| (position, scores.get_or_neutral(*t)))
        .collect();
    // Stable: equal scores keep triad order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (top, second, third) = (ranked[0], ranked[1], ranked[2]);
    if top.1 - second.1 >= TIE_EPSILON {
        return triad[top.0];
    }
    if top.1 - third.1 < TIE_EPSILON {
        return triad[1];
    }
    let pair = [top.0, second.0];
    if pair.contains(&0) && pair.contains(&2) {
        triad[1]
    } else {
        triad[top.0]
    }
}

/// Dominant trait for every triad.
pub fn dominant_traits(scores: &TraitScores) -> DominantTraits {
    TRIADS
        .iter()
        .map(|triad| (triad.key(), determine_dominant_trait(&triad.traits, scores)))
        .collect()
}
