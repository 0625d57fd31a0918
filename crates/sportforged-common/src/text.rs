//! Text normalization shared by lookups, selectors, and team matching.

/// Lowercase and drop every non-alphanumeric character.
///
/// This is the canonical "normalized token" form used for all exact lookups.
pub fn normalize_token(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase, turn separators into single spaces, and trim.
///
/// Keeps word boundaries, unlike [`normalize_token`].
pub fn normalize_words(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an integer that may carry leading zeros or surrounding noise like `R05`.
pub fn parse_loose_int(value: &str) -> Option<i64> {
    let digits: String = value
        .trim()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("Free Practice 1"), "freepractice1");
        assert_eq!(normalize_token("Celtics vs. Heat"), "celticsvsheat");
        assert_eq!(normalize_token("Pre-Race Show!"), "preraceshow");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn test_normalize_words() {
        assert_eq!(normalize_words("Monaco.GP__Race"), "monaco gp race");
        assert_eq!(normalize_words("  Week   3 "), "week 3");
    }

    #[test]
    fn test_parse_loose_int() {
        assert_eq!(parse_loose_int("05"), Some(5));
        assert_eq!(parse_loose_int("R12"), Some(12));
        assert_eq!(parse_loose_int("Round 3 extra"), Some(3));
        assert_eq!(parse_loose_int("final"), None);
    }
}
