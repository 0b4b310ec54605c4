//! Nearest historical and fictional personas.

use serde::{Deserialize, Serialize};

use super::{Framework, Mapped, TraitReader};
use crate::scoring::TraitScores;
use crate::taxonomy::{MAX_SCORE, PersonalityTrait as T, PersonalityTrait};

/// Targets at or above this count extra.
const DEFINING_TARGET: f64 = 8.0;
const DEFINING_WEIGHT: f64 = 1.2;

const PER_KIND: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeKind {
    Real,
    Fictional,
}

pub struct Archetype {
    pub name: &'static str,
    pub kind: ArchetypeKind,
    pub description: &'static str,
    pub targets: &'static [(PersonalityTrait, f64)],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeMatch {
    pub name: String,
    pub kind: ArchetypeKind,
    pub description: String,
    /// 0 to 1, 1 being an exact match on every defining trait.
    pub similarity: f64,
}

pub const CATALOG: &[Archetype] = &[
    Archetype {
        name: "Albert Einstein",
        kind: ArchetypeKind::Real,
        description: "Theoretical physicist driven by thought experiments",
        targets: &[(T::Innovative, 9.0), (T::Intuitive, 8.0), (T::Analytical, 8.0), (T::Flexible, 7.0)],
    },
    Archetype {
        name: "Marie Curie",
        kind: ArchetypeKind::Real,
        description: "Methodical pioneer of radioactivity research",
        targets: &[(T::Analytical, 9.0), (T::Purposeful, 9.0), (T::Reserved, 7.0), (T::Deliberate, 8.0)],
    },
    Archetype {
        name: "Abraham Lincoln",
        kind: ArchetypeKind::Real,
        description: "Measured statesman who held a divided nation together",
        targets: &[(T::Purposeful, 9.0), (T::Tactful, 8.0), (T::Measured, 8.0), (T::Considerate, 7.0)],
    },
    Archetype {
        name: "Mahatma Gandhi",
        kind: ArchetypeKind::Real,
        description: "Principled leader of nonviolent resistance",
        targets: &[(T::Empathetic, 9.0), (T::Purposeful, 9.0), (T::Composed, 8.0), (T::Content, 7.0)],
    },
    Archetype {
        name: "Steve Jobs",
        kind: ArchetypeKind::Real,
        description: "Exacting product visionary",
        targets: &[(T::Innovative, 9.0), (T::Assertive, 9.0), (T::Direct, 8.0), (T::Ambitious, 8.0)],
    },
    Archetype {
        name: "Nelson Mandela",
        kind: ArchetypeKind::Real,
        description: "Patient reconciler after long imprisonment",
        targets: &[(T::Diplomatic, 9.0), (T::Composed, 8.0), (T::Purposeful, 9.0), (T::Trusting, 6.0)],
    },
    Archetype {
        name: "Oprah Winfrey",
        kind: ArchetypeKind::Real,
        description: "Warm communicator who builds connection at scale",
        targets: &[(T::Extraverted, 9.0), (T::Empathetic, 8.0), (T::Expressive, 8.0), (T::Ambitious, 7.0)],
    },
    Archetype {
        name: "Leonardo da Vinci",
        kind: ArchetypeKind::Real,
        description: "Restless polymath of art and engineering",
        targets: &[(T::Holistic, 9.0), (T::Innovative, 9.0), (T::Spontaneous, 7.0), (T::Sensing, 7.0)],
    },
    Archetype {
        name: "Sherlock Holmes",
        kind: ArchetypeKind::Fictional,
        description: "Consulting detective who trusts only evidence",
        targets: &[(T::Analytical, 10.0), (T::Detached, 8.0), (T::Skeptical, 8.0), (T::Introverted, 7.0)],
    },
    Archetype {
        name: "Hermione Granger",
        kind: ArchetypeKind::Fictional,
        description: "Diligent scholar with a strong sense of fairness",
        targets: &[(T::Structured, 9.0), (T::Ambitious, 8.0), (T::Conventional, 7.0), (T::Direct, 7.0)],
    },
    Archetype {
        name: "Atticus Finch",
        kind: ArchetypeKind::Fictional,
        description: "Quietly principled small-town lawyer",
        targets: &[(T::Composed, 9.0), (T::Considerate, 8.0), (T::Purposeful, 8.0), (T::Measured, 7.0)],
    },
    Archetype {
        name: "Tony Stark",
        kind: ArchetypeKind::Fictional,
        description: "Brash inventor who improvises under pressure",
        targets: &[(T::Innovative, 9.0), (T::Impulsive, 8.0), (T::Assertive, 8.0), (T::Extraverted, 7.0)],
    },
    Archetype {
        name: "Gandalf",
        kind: ArchetypeKind::Fictional,
        description: "Wandering guide who sees the longer pattern",
        targets: &[(T::Holistic, 9.0), (T::Discerning, 8.0), (T::Purposeful, 8.0), (T::Reserved, 6.0)],
    },
    Archetype {
        name: "Spock",
        kind: ArchetypeKind::Fictional,
        description: "Logician who keeps emotion at arm's length",
        targets: &[(T::Analytical, 9.0), (T::Reserved, 9.0), (T::Deliberate, 8.0), (T::Detached, 7.0)],
    },
    Archetype {
        name: "Elizabeth Bennet",
        kind: ArchetypeKind::Fictional,
        description: "Quick-witted observer who speaks her mind",
        targets: &[(T::Direct, 8.0), (T::Discerning, 8.0), (T::Expressive, 7.0), (T::Flexible, 6.0)],
    },
    Archetype {
        name: "Jay Gatsby",
        kind: ArchetypeKind::Fictional,
        description: "Self-invented dreamer chasing one vision",
        targets: &[(T::Ambitious, 9.0), (T::Extraverted, 8.0), (T::Intuitive, 7.0), (T::Expressive, 6.0)],
    },
];

fn similarity(reader: &mut TraitReader<'_>, archetype: &Archetype) -> f64 {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for &(t, target) in archetype.targets {
        let weight = if target >= DEFINING_TARGET {
            DEFINING_WEIGHT
        } else {
            1.0
        };
        total += weight * (MAX_SCORE - (reader.score(t) - target).abs()).max(0.0);
        weight_sum += weight;
    }
    if weight_sum == 0.0 {
        return 0.0;
    }
    (total / weight_sum / MAX_SCORE).clamp(0.0, 1.0)
}

/// Best three real and best three fictional personas, merged strongest first.
pub fn match_archetypes(scores: &TraitScores) -> Mapped<Vec<ArchetypeMatch>> {
    let mut reader = TraitReader::new(scores, Framework::Archetype);
    let mut all: Vec<ArchetypeMatch> = CATALOG
        .iter()
        .map(|a| ArchetypeMatch {
            name: a.name.to_string(),
            kind: a.kind,
            description: a.description.to_string(),
            similarity: similarity(&mut reader, a),
        })
        .collect();
    all.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

    let pick = |kind: ArchetypeKind| {
        all.iter()
            .filter(move |m: &&ArchetypeMatch| m.kind == kind)
            .take(PER_KIND)
    };
    let mut merged: Vec<ArchetypeMatch> = pick(ArchetypeKind::Real)
        .chain(pick(ArchetypeKind::Fictional))
        .cloned()
        .collect();
    merged.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    merged.truncate(PER_KIND * 2);
    reader.finish(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(score: f64) -> TraitScores {
        PersonalityTrait::ALL.iter().map(|t| (*t, score)).collect()
    }

    #[test]
    fn catalog_has_enough_of_each_kind() {
        let real = CATALOG.iter().filter(|a| a.kind == ArchetypeKind::Real).count();
        assert!(real >= 8);
        assert!(CATALOG.len() - real >= 8);
        for a in CATALOG {
            assert!((3..=5).contains(&a.targets.len()), "{}", a.name);
        }
    }

    #[test]
    fn returns_three_of_each_sorted() {
        let matches = match_archetypes(&uniform(5.0)).value;
        assert_eq!(matches.len(), 6);
        let real = matches.iter().filter(|m| m.kind == ArchetypeKind::Real).count();
        assert_eq!(real, 3);
        assert!(matches.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert!(matches.iter().all(|m| (0.0..=1.0).contains(&m.similarity)));
    }

    #[test]
    fn exact_match_scores_one_and_leads() {
        let mut scores = uniform(5.0);
        for (t, target) in [
            (T::Analytical, 10.0),
            (T::Detached, 8.0),
            (T::Skeptical, 8.0),
            (T::Introverted, 7.0),
        ] {
            scores.insert(t, target);
        }
        let matches = match_archetypes(&scores).value;
        assert_eq!(matches[0].name, "Sherlock Holmes");
        assert!((matches[0].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn defining_traits_weigh_more() {
        let archetype = &CATALOG[0];
        let mut scores = uniform(5.0);
        for &(t, target) in archetype.targets {
            scores.insert(t, target);
        }
        // miss the 7.0 target by 2, then a defining 9.0 target by 2
        let mut off_minor = scores.clone();
        off_minor.insert(T::Flexible, 5.0);
        let mut off_defining = scores.clone();
        off_defining.insert(T::Innovative, 7.0);

        let minor = similarity(&mut TraitReader::new(&off_minor, Framework::Archetype), archetype);
        let defining = similarity(&mut TraitReader::new(&off_defining, Framework::Archetype), archetype);
        assert!(minor > defining);
    }
}
