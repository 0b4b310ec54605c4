//! The fixed trait hierarchy: 36 traits, grouped into 12 triads of three
//! mutually exclusive traits, grouped into 4 domains of three triads.
//!
//! Triad order matters. The first and third traits of a triad are polar
//! opposites and the middle trait is the balanced one; the dominant-trait
//! resolver relies on this ordering to break ties.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of questionnaire items in a complete response vector.
pub const RESPONSE_COUNT: usize = 108;

/// Items read per trait in the built-in index table.
pub const ITEMS_PER_TRAIT: usize = 6;

/// Value substituted for a missing response or trait score.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Lowest and highest legal trait score.
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

macro_rules! personality_traits {
    ($($variant:ident),+ $(,)?) => {
        /// One of the 36 scored personality traits.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum PersonalityTrait {
            $($variant),+
        }

        impl PersonalityTrait {
            /// Every trait, in triad table order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for PersonalityTrait {
            type Err = UnknownTrait;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownTrait(trimmed.to_string()))
            }
        }
    };
}

personality_traits! {
    Assertive, Diplomatic, Accommodating,
    Extraverted, Ambiverted, Introverted,
    Structured, Flexible, Spontaneous,
    Expressive, Composed, Reserved,
    Sensing, Grounded, Intuitive,
    Ambitious, Purposeful, Content,
    Empathetic, Considerate, Detached,
    Trusting, Discerning, Skeptical,
    Direct, Tactful, Indirect,
    Analytical, Integrative, Holistic,
    Deliberate, Measured, Impulsive,
    Conventional, Adaptive, Innovative,
}

impl fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait name that is not part of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trait: {0}")]
pub struct UnknownTrait(pub String);

/// Top-level grouping of triads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    External,
    Internal,
    Interpersonal,
    Processing,
}

impl Domain {
    pub const ALL: &'static [Self] = &[
        Self::External,
        Self::Internal,
        Self::Interpersonal,
        Self::Processing,
    ];

    /// The three triads of this domain, in canonical order.
    pub fn triads(self) -> impl Iterator<Item = &'static Triad> {
        TRIADS.iter().filter(move |t| t.domain == self)
    }

    /// The nine traits of this domain.
    pub fn traits(self) -> impl Iterator<Item = PersonalityTrait> {
        self.triads().flat_map(|t| t.traits.iter().copied())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::External => "External",
            Self::Internal => "Internal",
            Self::Interpersonal => "Interpersonal",
            Self::Processing => "Processing",
        };
        f.write_str(name)
    }
}

/// Three mutually exclusive traits: two poles with the balanced trait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triad {
    pub domain: Domain,
    pub name: &'static str,
    pub traits: [PersonalityTrait; 3],
}

impl Triad {
    /// `"<Domain>-<Triad>"`, the key used in dominant-trait maps.
    pub fn key(&self) -> String {
        format!("{}-{}", self.domain, self.name)
    }

    /// The balanced trait between the two poles.
    pub fn middle(&self) -> PersonalityTrait {
        self.traits[1]
    }

    pub fn contains(&self, t: PersonalityTrait) -> bool {
        self.traits.contains(&t)
    }

    /// Look a triad up by its key.
    pub fn by_key(key: &str) -> Option<&'static Triad> {
        TRIADS.iter().find(|t| t.key() == key)
    }

    /// The triad a trait belongs to.
    pub fn of(t: PersonalityTrait) -> &'static Triad {
        // Variants are declared three per triad, in table order.
        &TRIADS[t as usize / 3]
    }
}

use PersonalityTrait as T;

/// All twelve triads in canonical order.
pub const TRIADS: [Triad; 12] = [
    Triad {
        domain: Domain::External,
        name: "Control",
        traits: [T::Assertive, T::Diplomatic, T::Accommodating],
    },
    Triad {
        domain: Domain::External,
        name: "Energy",
        traits: [T::Extraverted, T::Ambiverted, T::Introverted],
    },
    Triad {
        domain: Domain::External,
        name: "Structure",
        traits: [T::Structured, T::Flexible, T::Spontaneous],
    },
    Triad {
        domain: Domain::Internal,
        name: "Emotion",
        traits: [T::Expressive, T::Composed, T::Reserved],
    },
    Triad {
        domain: Domain::Internal,
        name: "Perception",
        traits: [T::Sensing, T::Grounded, T::Intuitive],
    },
    Triad {
        domain: Domain::Internal,
        name: "Motivation",
        traits: [T::Ambitious, T::Purposeful, T::Content],
    },
    Triad {
        domain: Domain::Interpersonal,
        name: "Empathy",
        traits: [T::Empathetic, T::Considerate, T::Detached],
    },
    Triad {
        domain: Domain::Interpersonal,
        name: "Trust",
        traits: [T::Trusting, T::Discerning, T::Skeptical],
    },
    Triad {
        domain: Domain::Interpersonal,
        name: "Communication",
        traits: [T::Direct, T::Tactful, T::Indirect],
    },
    Triad {
        domain: Domain::Processing,
        name: "Reasoning",
        traits: [T::Analytical, T::Integrative, T::Holistic],
    },
    Triad {
        domain: Domain::Processing,
        name: "Decision",
        traits: [T::Deliberate, T::Measured, T::Impulsive],
    },
    Triad {
        domain: Domain::Processing,
        name: "Change",
        traits: [T::Conventional, T::Adaptive, T::Innovative],
    },
];

/// Built-in trait to item table (1-based item numbers).
///
/// Triad `t` owns items `9t+1 ..= 9t+9`. With offsets 0..8 inside that block,
/// the first trait reads 0-5, the middle trait 3-8 and the third trait 0-2
/// plus 6-8, so each item feeds exactly two traits of its triad.
pub fn default_trait_indices() -> BTreeMap<PersonalityTrait, Vec<usize>> {
    let mut table = BTreeMap::new();
    for (t, triad) in TRIADS.iter().enumerate() {
        let base = t * 9 + 1;
        let offsets: [&[usize]; 3] = [&[0, 1, 2, 3, 4, 5], &[3, 4, 5, 6, 7, 8], &[0, 1, 2, 6, 7, 8]];
        for (member, offsets) in triad.traits.iter().zip(offsets) {
            table.insert(*member, offsets.iter().map(|o| base + o).collect());
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn thirty_six_distinct_traits_in_twelve_triads() {
        assert_eq!(PersonalityTrait::ALL.len(), 36);
        let from_triads: HashSet<_> = TRIADS.iter().flat_map(|t| t.traits).collect();
        assert_eq!(from_triads.len(), 36);
    }

    #[test]
    fn each_domain_has_three_triads_and_nine_traits() {
        for domain in Domain::ALL {
            assert_eq!(domain.triads().count(), 3, "{domain}");
            assert_eq!(domain.traits().count(), 9, "{domain}");
        }
    }

    #[test]
    fn every_trait_finds_its_own_triad() {
        for &t in PersonalityTrait::ALL {
            assert!(Triad::of(t).contains(t), "{t}");
        }
        assert_eq!(Triad::of(PersonalityTrait::Innovative).key(), "Processing-Change");
    }

    #[test]
    fn triad_keys_are_domain_dash_name() {
        assert_eq!(TRIADS[0].key(), "External-Control");
        assert_eq!(TRIADS[11].key(), "Processing-Change");
        assert_eq!(
            Triad::by_key("Interpersonal-Trust").map(|t| t.middle()),
            Some(PersonalityTrait::Discerning)
        );
        assert!(Triad::by_key("Interpersonal-Nope").is_none());
    }

    #[test]
    fn triad_of_trait_round_trips() {
        for triad in &TRIADS {
            for t in triad.traits {
                assert_eq!(Triad::of(t), triad);
            }
        }
    }

    #[test]
    fn trait_names_parse_case_insensitively() {
        assert_eq!(
            "empathetic".parse::<PersonalityTrait>(),
            Ok(PersonalityTrait::Empathetic)
        );
        assert_eq!(
            " Innovative ".parse::<PersonalityTrait>(),
            Ok(PersonalityTrait::Innovative)
        );
        assert!("Grumpy".parse::<PersonalityTrait>().is_err());
    }

    #[test]
    fn default_table_covers_every_item_twice() {
        let table = default_trait_indices();
        assert_eq!(table.len(), 36);
        let mut uses = vec![0usize; RESPONSE_COUNT + 1];
        for indices in table.values() {
            assert_eq!(indices.len(), ITEMS_PER_TRAIT);
            for &i in indices {
                assert!((1..=RESPONSE_COUNT).contains(&i));
                uses[i] += 1;
            }
        }
        assert!(uses[1..].iter().all(|&n| n == 2));
    }
}
