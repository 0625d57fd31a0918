//! Replacement rule used when no enabled quality profile applies.

use regex::Regex;
use std::sync::LazyLock;

static LEGACY_UPGRADE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])(?:proper|repack|2160p)(?:$|[^a-z0-9])")
        .expect("legacy marker pattern is valid")
});

static SPECIFICITY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:part|stage|round|heat|qualifier)\b").expect("specificity pattern is valid")
});

/// How specific a session label reads.
///
/// Digits count double; separators and part/stage/round/heat/qualifier
/// markers count once each.
pub fn session_specificity(label: &str) -> usize {
    let digits = label.chars().filter(char::is_ascii_digit).count();
    let separators = label
        .chars()
        .filter(|c| matches!(c, ' ' | '.' | '-' | '_'))
        .count();
    let markers = SPECIFICITY_MARKER.find_iter(label).count();
    digits * 2 + separators + markers
}

/// Legacy decision: replace on PROPER/REPACK/2160p markers, or when the new
/// label is strictly more specific than every other alias of the episode.
///
/// Returns the decision and a reason.
pub fn should_replace_legacy(
    filename: &str,
    session_label: &str,
    known_aliases: &[String],
) -> (bool, String) {
    if LEGACY_UPGRADE_MARKER.is_match(filename) {
        return (true, "Release marker forces replacement".to_string());
    }

    let label_score = session_specificity(session_label);
    let others: Vec<&String> = known_aliases
        .iter()
        .filter(|alias| !alias.eq_ignore_ascii_case(session_label))
        .collect();

    if !others.is_empty()
        && others
            .iter()
            .all(|alias| label_score > session_specificity(alias))
    {
        return (
            true,
            format!("Session label '{}' is more specific", session_label),
        );
    }

    (false, "Existing file kept".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specificity() {
        assert_eq!(session_specificity("Race"), 0);
        assert_eq!(session_specificity("Free Practice 1"), 4);
        assert_eq!(session_specificity("Stage 12"), 6);
    }

    #[test]
    fn test_markers_force_replace() {
        let (replace, _) = should_replace_legacy("Race.2160p.mkv", "Race", &[]);
        assert!(replace);
        let (replace, _) = should_replace_legacy("Race.REPACK.1080p.mkv", "Race", &[]);
        assert!(replace);
    }

    #[test]
    fn test_more_specific_label_replaces() {
        let aliases = vec!["Practice".to_string(), "FP".to_string()];
        let (replace, reason) = should_replace_legacy("x.mkv", "Free Practice 1", &aliases);
        assert!(replace);
        assert!(reason.contains("more specific"));

        let (replace, _) = should_replace_legacy("x.mkv", "Practice", &aliases);
        assert!(!replace);
    }

    #[test]
    fn test_needs_other_aliases() {
        let aliases = vec!["Race 1".to_string()];
        let (replace, _) = should_replace_legacy("x.mkv", "Race 1", &aliases);
        assert!(!replace);
    }
}
