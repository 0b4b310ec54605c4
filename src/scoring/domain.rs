use std::collections::BTreeMap;

use crate::scoring::TraitScores;
use crate::taxonomy::Domain;

/// Domain to the unweighted mean of its nine trait scores.
pub type DomainScores = BTreeMap<Domain, f64>;

pub fn calculate_domain_scores(scores: &TraitScores) -> DomainScores {
    Domain::ALL
        .iter()
        .map(|&domain| {
            let (total, count) = domain
                .traits()
                .fold((0.0, 0usize), |(sum, n), t| (sum + scores.get_or_neutral(t), n + 1));
            (domain, total / count as f64)
        })
        .collect()
}
