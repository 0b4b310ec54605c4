/// Socionics type for a four-letter MBTI code.
///
/// The letters carry over directly with the last one lower-cased, followed
/// by the three-letter abbreviation. Anything that is not one of the sixteen
/// codes is returned unchanged.
pub fn map_socionics(mbti: &str) -> String {
    let abbreviation = match mbti {
        "ISTJ" => "LSI",
        "ISTP" => "SLI",
        "ISFJ" => "ESI",
        "ISFP" => "SEI",
        "INTJ" => "LII",
        "INTP" => "ILI",
        "INFJ" => "EII",
        "INFP" => "IEI",
        "ESTJ" => "LSE",
        "ESTP" => "SLE",
        "ESFJ" => "ESE",
        "ESFP" => "SEE",
        "ENTJ" => "LIE",
        "ENTP" => "ILE",
        "ENFJ" => "EIE",
        "ENFP" => "IEE",
        _ => {
            tracing::warn!(mbti, "Unrecognised MBTI code, Socionics left unmapped");
            return mbti.to_string();
        }
    };
    let (head, last) = mbti.split_at(3);
    format!("{head}{} ({abbreviation})", last.to_ascii_lowercase())
}
