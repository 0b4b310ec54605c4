//! Deterministic material for the clarification flow: fallback questions,
//! candidate descriptions and the keyword cues used when no oracle
//! judgement is available.

use super::Cusp;
use crate::mapping::IntegralLevel;
use crate::taxonomy::PersonalityTrait as T;

/// Confidence assigned to a keyword judgement.
pub const KEYWORD_CONFIDENCE: f64 = 0.5;

const TRAIT_TEMPLATES: [&str; 3] = [
    "Think about a recent situation that mattered to you. Were you more {options}? Describe what you actually did.",
    "When you are under pressure, which comes more naturally to you: being {options}? Give an example.",
    "How would someone who knows you well describe you: {options}? What would they point to?",
];

const INTEGRAL_TEMPLATES: [&str; 3] = [
    "Think about a hard decision you made recently. What mattered most to you when you made it?",
    "When the people around you disagree about what is right, how do you decide whose view to follow?",
    "What does a good life look like to you, and how has that picture changed over the years?",
];

struct TraitCue {
    name: T,
    description: &'static str,
    keywords: &'static [&'static str],
}

const fn cue(name: T, description: &'static str, keywords: &'static [&'static str]) -> TraitCue {
    TraitCue {
        name,
        description,
        keywords,
    }
}

const TRAIT_CUES: [TraitCue; 36] = [
    cue(T::Assertive, "takes charge and says what they want", &["lead", "charge", "decid", "push", "insist", "control"]),
    cue(T::Diplomatic, "looks for the arrangement everyone can accept", &["compromis", "negotiat", "middle", "mediat", "fair"]),
    cue(T::Accommodating, "goes along with others to keep things smooth", &["accommodat", "yield", "defer", "support", "agree", "help"]),
    cue(T::Extraverted, "draws energy from people and activity", &["people", "party", "social", "crowd", "friend", "talk"]),
    cue(T::Ambiverted, "moves between company and solitude as needed", &["sometimes", "mix", "both", "mood", "balance"]),
    cue(T::Introverted, "recharges alone and prefers depth to breadth", &["alone", "quiet", "recharg", "home", "solitude", "reading", "book"]),
    cue(T::Structured, "plans ahead and likes things settled", &["plan", "schedul", "list", "organi", "routine", "prepar"]),
    cue(T::Flexible, "keeps a plan but adjusts it freely", &["adjust", "flexib", "open", "depend", "roughly"]),
    cue(T::Spontaneous, "acts in the moment and improvises", &["spontan", "moment", "whim", "improvis", "wing", "unplann"]),
    cue(T::Expressive, "shows feelings openly", &["show", "express", "cry", "laugh", "share", "emotion"]),
    cue(T::Composed, "stays even and steady when things heat up", &["calm", "steady", "compos", "breath", "cool"]),
    cue(T::Reserved, "keeps feelings private", &["private", "keep", "hide", "reserv", "inside", "bottle"]),
    cue(T::Sensing, "trusts concrete facts and details", &["detail", "fact", "concrete", "practical", "hands", "observ"]),
    cue(T::Grounded, "mixes practical sense with some imagination", &["realist", "sensible", "grounded", "experience", "workable"]),
    cue(T::Intuitive, "reads patterns and possibilities", &["pattern", "idea", "future", "possib", "imagin", "meaning"]),
    cue(T::Ambitious, "drives toward achievement and recognition", &["goal", "winning", "winner", "achiev", "success", "career", "promot"]),
    cue(T::Purposeful, "is moved by meaning more than status", &["purpose", "mission", "value", "matter", "cause"]),
    cue(T::Content, "is at ease with what they have", &["enjoy", "happy", "content", "peace", "enough", "relax"]),
    cue(T::Empathetic, "feels what others feel", &["feel", "empath", "hurt", "comfort", "care", "emotion"]),
    cue(T::Considerate, "is mindful of others without being absorbed by them", &["consider", "polite", "thought", "respect", "kind"]),
    cue(T::Detached, "keeps an objective distance", &["logic", "objective", "distance", "detach", "rational", "fact"]),
    cue(T::Trusting, "assumes good intent", &["trust", "believ", "faith", "benefit", "open"]),
    cue(T::Discerning, "trusts once there is reason to", &["check", "evidence", "careful", "judg", "verif", "depend"]),
    cue(T::Skeptical, "wants proof before trusting", &["doubt", "suspic", "skeptic", "proof", "prove", "wait"]),
    cue(T::Direct, "says things plainly", &["direct", "blunt", "straight", "honest", "frank", "tell"]),
    cue(T::Tactful, "chooses words with care", &["tact", "gentle", "wording", "soften", "phras", "kind"]),
    cue(T::Indirect, "hints rather than states", &["hint", "subtle", "avoid", "implie", "implic", "imply", "indirect", "around"]),
    cue(T::Analytical, "breaks problems into parts", &["analy", "logic", "data", "break", "step", "systemat"]),
    cue(T::Integrative, "combines analysis with the wider view", &["combin", "connect", "integrat", "both", "blend"]),
    cue(T::Holistic, "sees the whole before the parts", &["whole", "big", "overall", "gut", "everything", "picture"]),
    cue(T::Deliberate, "researches and weighs options", &["research", "weigh", "compar", "think", "slow", "careful"]),
    cue(T::Measured, "decides at a moderate pace", &["reason", "moderat", "measured", "enough", "sensible"]),
    cue(T::Impulsive, "decides quickly on instinct", &["quick", "instinct", "impuls", "immediate", "jump", "fast"]),
    cue(T::Conventional, "sticks with proven ways", &["tradition", "proven", "usual", "rule", "familiar", "convention"]),
    cue(T::Adaptive, "changes approach when the situation changes", &["adapt", "adjust", "change", "evolv", "flexib"]),
    cue(T::Innovative, "looks for new ways of doing things", &["new", "invent", "innovat", "experiment", "creativ", "different"]),
];

fn trait_cue(t: T) -> Option<&'static TraitCue> {
    TRAIT_CUES.iter().find(|c| c.name == t)
}

/// One-line description of a trait, used in prompts and candidate lists.
pub fn trait_description(t: T) -> &'static str {
    trait_cue(t).map_or("", |c| c.description)
}

pub fn trait_keywords(t: T) -> &'static [&'static str] {
    trait_cue(t).map(|c| c.keywords).unwrap_or_default()
}

pub fn level_keywords(level: IntegralLevel) -> &'static [&'static str] {
    match level {
        IntegralLevel::Beige => &["surviv", "food", "safe", "basic", "need", "shelter"],
        IntegralLevel::Purple => &["family", "tradition", "tribe", "belong", "ritual", "ancestor", "loyal"],
        IntegralLevel::Red => &["power", "respect", "strong", "fight", "dominat", "instant", "immediat"],
        IntegralLevel::Blue => &["rule", "duty", "order", "right", "moral", "disciplin", "law"],
        IntegralLevel::Orange => &["achiev", "success", "winning", "winner", "goal", "compet", "progress", "result"],
        IntegralLevel::Green => &["harmony", "community", "equal", "feel", "together", "share", "care"],
        IntegralLevel::Yellow => &["system", "context", "complex", "perspect", "integrat", "depend"],
        IntegralLevel::Turquoise => &["whole", "planet", "connect", "universe", "spirit", "global"],
    }
}

fn join_options(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

/// Fallback question about a trait cusp. `index` is the question's position
/// in the session and picks the template.
pub fn trait_question(cusp: &Cusp, index: usize) -> String {
    let names: Vec<String> = cusp
        .candidates
        .iter()
        .map(|c| c.name.to_lowercase())
        .collect();
    TRAIT_TEMPLATES[index % TRAIT_TEMPLATES.len()].replace("{options}", &join_options(&names))
}

/// Fallback question about an Integral cusp. Options are never named.
pub fn integral_question(index: usize) -> String {
    INTEGRAL_TEMPLATES[index % INTEGRAL_TEMPLATES.len()].to_string()
}

/// Pick the candidate whose keywords appear most often in `answer`.
///
/// Words match a keyword when they start with it, so `"planning"` counts
/// for `"plan"`. Returns `None` unless exactly one candidate leads with at
/// least one hit.
pub fn keyword_judgement(cusp: &Cusp, answer: &str) -> Option<String> {
    let answer = answer.to_lowercase();
    let words: Vec<&str> = answer
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best: Option<(&str, usize)> = None;
    let mut tied = false;
    for candidate in &cusp.candidates {
        let hits = words
            .iter()
            .filter(|w| candidate.keywords.iter().any(|k| w.starts_with(k.as_str())))
            .count();
        match best {
            Some((_, top)) if hits == top => tied = true,
            Some((_, top)) if hits < top => {}
            _ => {
                best = Some((candidate.name.as_str(), hits));
                tied = false;
            }
        }
    }

    match best {
        Some((name, hits)) if hits > 0 && !tied => Some(name.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Candidate;

    fn cusp(candidates: &[(&str, &[&str])]) -> Cusp {
        Cusp {
            key: "Test".to_string(),
            candidates: candidates
                .iter()
                .map(|(name, keywords)| Candidate {
                    name: name.to_string(),
                    description: String::new(),
                    score: 5.0,
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
            spread: 0.0,
        }
    }

    #[test]
    fn every_trait_has_a_cue() {
        for t in T::ALL {
            assert!(!trait_description(*t).is_empty(), "{t} has no description");
            assert!(!trait_keywords(*t).is_empty(), "{t} has no keywords");
        }
    }

    #[test]
    fn keyword_judgement_picks_unique_leader() {
        let c = cusp(&[("Structured", &["plan", "list"]), ("Spontaneous", &["moment"])]);
        assert_eq!(
            keyword_judgement(&c, "I planned it all and kept a list."),
            Some("Structured".to_string())
        );
        assert_eq!(
            keyword_judgement(&c, "In the MOMENT, honestly."),
            Some("Spontaneous".to_string())
        );
    }

    #[test]
    fn keyword_judgement_needs_a_clear_winner() {
        let c = cusp(&[("Structured", &["plan"]), ("Spontaneous", &["moment"])]);
        assert_eq!(keyword_judgement(&c, "I plan for the moment."), None);
        assert_eq!(keyword_judgement(&c, "No idea."), None);
    }

    #[test]
    fn common_words_do_not_hit_short_stems() {
        let c = cusp(&[
            ("Direct", trait_keywords(T::Direct)),
            ("Indirect", trait_keywords(T::Indirect)),
        ]);
        assert_eq!(
            keyword_judgement(&c, "I tell them, then implement it"),
            Some("Direct".to_string())
        );
        assert_eq!(
            keyword_judgement(&c, "I implied it and left it there."),
            Some("Indirect".to_string())
        );

        let c = cusp(&[
            ("Ambitious", trait_keywords(T::Ambitious)),
            ("Spontaneous", trait_keywords(T::Spontaneous)),
        ]);
        assert_eq!(keyword_judgement(&c, "At last I opened the window."), None);
    }

    #[test]
    fn later_leader_replaces_earlier_tie() {
        let c = cusp(&[("A", &["x"]), ("B", &["y"]), ("C", &["z"])]);
        assert_eq!(keyword_judgement(&c, "x y z z"), Some("C".to_string()));
    }

    #[test]
    fn trait_question_names_options() {
        let c = cusp(&[("Direct", &[]), ("Tactful", &[]), ("Indirect", &[])]);
        assert_eq!(
            trait_question(&c, 4),
            "When you are under pressure, which comes more naturally to you: being direct, tactful or indirect? Give an example."
        );
    }

    #[test]
    fn integral_questions_vary_by_index() {
        assert_ne!(integral_question(0), integral_question(1));
        assert_eq!(integral_question(0), integral_question(3));
    }
}
