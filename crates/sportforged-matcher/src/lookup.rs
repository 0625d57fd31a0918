//! Session lookup index.
//!
//! Maps normalized tokens to canonical session titles. A secondary index
//! buckets tokens by (first character, length) so that fuzzy lookups only
//! compare against tokens that could plausibly be one edit away.

use sportforged_common::text::normalize_token;
use sportforged_common::Season;
use std::collections::{BTreeMap, HashMap};

use crate::similarity;

/// Minimum token length for fuzzy lookups.
pub const FUZZY_MIN_LEN: usize = 4;

/// Minimum similarity for a fuzzy lookup to be accepted.
pub const FUZZY_ACCEPT: f64 = 0.85;

/// Generic session names every sport understands, with common spellings.
pub const GENERIC_SESSION_ALIASES: &[(&str, &[&str])] = &[
    ("Race", &["race", "grand prix", "gp", "main race", "feature race"]),
    ("Qualifying", &["qualifying", "quali", "qualy", "qual", "qualification"]),
    ("Sprint", &["sprint", "sprint race"]),
    (
        "Sprint Qualifying",
        &["sprint qualifying", "sprint quali", "sprint shootout", "sq"],
    ),
    (
        "Free Practice 1",
        &["fp1", "practice 1", "free practice one", "first practice"],
    ),
    (
        "Free Practice 2",
        &["fp2", "practice 2", "free practice two", "second practice"],
    ),
    (
        "Free Practice 3",
        &["fp3", "practice 3", "free practice three", "third practice"],
    ),
    ("Practice", &["practice", "free practice", "fp"]),
    ("Warm Up", &["warm up", "warmup"]),
    ("Pre-Race", &["pre race", "pre race show", "build up", "buildup"]),
    ("Post-Race", &["post race", "post race show"]),
    ("Highlights", &["highlights", "extended highlights"]),
];

#[derive(Debug, Clone, Default)]
pub struct SessionLookupIndex {
    entries: HashMap<String, String>,
    buckets: HashMap<(char, usize), Vec<String>>,
}

impl SessionLookupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for one season.
    ///
    /// Episode titles and aliases go in first, then pattern-declared session
    /// aliases (overwriting), then the generic table beneath both.
    pub fn build(season: &Season, session_aliases: &BTreeMap<String, Vec<String>>) -> Self {
        let mut index = Self::new();
        for episode in &season.episodes {
            for name in episode.names() {
                index.insert(name, &episode.title);
            }
        }
        for (canonical, aliases) in session_aliases {
            index.insert(canonical, canonical);
            for alias in aliases {
                index.insert(alias, canonical);
            }
        }
        for (canonical, aliases) in GENERIC_SESSION_ALIASES {
            index.insert_if_absent(canonical, canonical);
            for alias in *aliases {
                index.insert_if_absent(alias, canonical);
            }
        }
        index
    }

    /// Map a token to a canonical title, replacing any earlier mapping.
    pub fn insert(&mut self, token: &str, canonical: &str) {
        let key = normalize_token(token);
        if key.is_empty() {
            return;
        }
        if self
            .entries
            .insert(key.clone(), canonical.to_string())
            .is_none()
        {
            self.add_to_bucket(key);
        }
    }

    /// Map a token only if it is not already present. Returns whether it was added.
    pub fn insert_if_absent(&mut self, token: &str, canonical: &str) -> bool {
        let key = normalize_token(token);
        if key.is_empty() || self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key.clone(), canonical.to_string());
        self.add_to_bucket(key);
        true
    }

    fn add_to_bucket(&mut self, key: String) {
        let Some(bucket_key) = bucket_key(&key) else {
            return;
        };
        match self.buckets.get_mut(&bucket_key) {
            Some(bucket) => bucket.push(key),
            None => {
                self.buckets.insert(bucket_key, vec![key]);
            }
        }
    }

    /// Exact lookup of a token (normalized before lookup).
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(&normalize_token(token)).map(String::as_str)
    }

    /// Tokens sharing the query's first character with length within one,
    /// paired with their canonical titles.
    pub fn get_candidates(&self, token: &str) -> Vec<(&str, &str)> {
        let key = normalize_token(token);
        let Some((first, len)) = bucket_key(&key) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();
        for candidate_len in len.saturating_sub(1)..=len + 1 {
            if let Some(bucket) = self.buckets.get(&(first, candidate_len)) {
                for entry in bucket {
                    if let Some(canonical) = self.entries.get(entry) {
                        candidates.push((entry.as_str(), canonical.as_str()));
                    }
                }
            }
        }
        candidates
    }

    /// Every (token, canonical) pair, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn bucket_key(token: &str) -> Option<(char, usize)> {
    let first = token.chars().next()?;
    Some((first, token.chars().count()))
}

/// Resolve a session token to its canonical title.
///
/// Exact first; tokens of [`FUZZY_MIN_LEN`] or more characters then fall
/// back to the best fuzzy candidate scoring at least [`FUZZY_ACCEPT`].
pub fn resolve_session_lookup(index: &SessionLookupIndex, token: &str) -> Option<String> {
    let key = normalize_token(token);
    if key.is_empty() {
        return None;
    }
    if let Some(canonical) = index.get(&key) {
        return Some(canonical.to_string());
    }
    if key.chars().count() < FUZZY_MIN_LEN {
        return None;
    }

    let mut best: Option<(f64, &str)> = None;
    for (candidate, canonical) in index.get_candidates(&key) {
        if !similarity::tokens_close(&key, candidate) {
            continue;
        }
        let score = similarity::ratio(&key, candidate);
        if score >= FUZZY_ACCEPT && best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, canonical));
        }
    }

    best.map(|(score, canonical)| {
        tracing::trace!(token = %key, canonical, score, "Fuzzy session lookup");
        canonical.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportforged_common::Episode;

    fn episode(title: &str, aliases: &[&str]) -> Episode {
        Episode {
            title: title.to_string(),
            summary: None,
            originally_available: None,
            index: 0,
            display_number: None,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            metadata: Default::default(),
        }
    }

    fn season(episodes: Vec<Episode>) -> Season {
        Season {
            key: "r01".to_string(),
            title: "Round 1".to_string(),
            summary: None,
            index: 0,
            sort_title: None,
            display_number: None,
            round_number: Some(1),
            episodes,
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_insert_last_write_wins() {
        let mut index = SessionLookupIndex::new();
        index.insert("Race", "Race");
        index.insert("race", "Feature Race");
        assert_eq!(index.get("RACE"), Some("Feature Race"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get_candidates("race").len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut index = SessionLookupIndex::new();
        index.insert("Quali", "Qualifying Session");
        assert!(!index.insert_if_absent("quali", "Qualifying"));
        assert!(index.insert_if_absent("qualy", "Qualifying"));
        assert_eq!(index.get("quali"), Some("Qualifying Session"));
    }

    #[test]
    fn test_empty_tokens_ignored() {
        let mut index = SessionLookupIndex::new();
        index.insert("...", "Nothing");
        assert!(index.is_empty());
        assert!(index.get_candidates("").is_empty());
    }

    #[test]
    fn test_candidates_respect_buckets() {
        let mut index = SessionLookupIndex::new();
        for token in [
            "qualifying", "qualifyin", "qualifyings", "qualifier", "q", "quali",
            "race", "racing", "sprint", "qualifyingsession",
        ] {
            index.insert(token, token);
        }
        for query in ["qualifying", "race", "sprint", "quali", "zzzz"] {
            let query_len = query.chars().count();
            let first = query.chars().next().unwrap();
            for (token, _) in index.get_candidates(query) {
                assert_eq!(token.chars().next().unwrap(), first, "{query} -> {token}");
                assert!(token.chars().count().abs_diff(query_len) <= 1, "{query} -> {token}");
            }
        }
        let tokens: Vec<&str> = index
            .get_candidates("qualifying")
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert!(tokens.contains(&"qualifyin"));
        assert!(tokens.contains(&"qualifyings"));
        assert!(tokens.contains(&"qualifying"));
        assert!(!tokens.contains(&"quali"));
    }

    #[test]
    fn test_build_layers_sources() {
        let mut pattern_aliases = BTreeMap::new();
        pattern_aliases.insert("Race".to_string(), vec!["Grand Prix".to_string()]);
        let season = season(vec![
            episode("Qualifying", &["Q"]),
            episode("Grand Prix", &[]),
        ]);

        let index = SessionLookupIndex::build(&season, &pattern_aliases);
        // Pattern aliases overwrite episode titles.
        assert_eq!(index.get("grand prix"), Some("Race"));
        assert_eq!(index.get("q"), Some("Qualifying"));
        // Generic aliases fill gaps only.
        assert_eq!(index.get("fp1"), Some("Free Practice 1"));
        assert_eq!(index.get("qualifying"), Some("Qualifying"));
    }

    #[test]
    fn test_resolve_exact_and_fuzzy() {
        let season = season(vec![episode("Qualifying", &[])]);
        let index = SessionLookupIndex::build(&season, &BTreeMap::new());
        assert_eq!(resolve_session_lookup(&index, "Qualifying").as_deref(), Some("Qualifying"));
        assert_eq!(resolve_session_lookup(&index, "qualifyng").as_deref(), Some("Qualifying"));
        assert_eq!(resolve_session_lookup(&index, "highlight").as_deref(), Some("Highlights"));
    }

    #[test]
    fn test_resolve_short_tokens_exact_only() {
        let index = SessionLookupIndex::build(&season(vec![]), &BTreeMap::new());
        assert_eq!(resolve_session_lookup(&index, "gp").as_deref(), Some("Race"));
        assert_eq!(resolve_session_lookup(&index, "rce"), None);
        assert_eq!(resolve_session_lookup(&index, ""), None);
    }
}
