//! Team alias resolution.
//!
//! Team names arrive spelled many ways ("Celtics", "Boston Celtics", "BOS").
//! A [`TeamAliasResolver`] maps normalized spellings to one canonical name.
//! Configured tables take precedence; spellings seen in the show's own
//! episode titles are layered beneath them.

use regex::Regex;
use sportforged_common::text::{normalize_token, normalize_words};
use sportforged_common::Show;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::config::TeamAliasTable;

/// Words that separate the two sides of a matchup.
pub const MATCHUP_SEPARATORS: &[&str] = &["vs", "v", "versus", "at"];

/// Trailing words that are never part of a team name.
const TEAM_NOISE_WORDS: &[&str] = &[
    "2160p", "1080p", "1080i", "720p", "576p", "480p", "4k", "uhd", "hd", "sd", "fhd", "web",
    "webdl", "dl", "webrip", "hdtv", "bluray", "x264", "x265", "h264", "h265", "hevc", "avc",
    "aac", "ac3", "eac3", "mkv", "mp4", "proper", "repack", "rerip", "full", "game", "replay",
    "espn", "tnt", "abc", "nbc", "cbs", "fox", "tsn", "sky", "bt", "dazn", "nbatv", "nhlnet",
    "mwr", "60fps", "50fps", "30fps",
];

static MATCHUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:vs\.?|v\.?|versus|at|@)\s+(.+)$").expect("matchup pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct TeamAliasResolver {
    lookup: HashMap<String, String>,
}

impl TeamAliasResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over a configured alias table.
    pub fn from_table(table: &TeamAliasTable) -> Self {
        let mut resolver = Self::new();
        for (canonical, variants) in table {
            resolver.add(canonical, canonical);
            for variant in variants {
                resolver.add(variant, canonical);
            }
        }
        resolver
    }

    /// Configured aliases (if any) plus every team spelling found in the
    /// show's episode titles and aliases.
    pub fn for_show(configured: Option<&TeamAliasResolver>, show: &Show) -> Self {
        let mut resolver = configured.cloned().unwrap_or_default();
        resolver.extend_from_show(show);
        resolver
    }

    /// Map a spelling to a canonical name, replacing any earlier mapping.
    pub fn add(&mut self, variant: &str, canonical: &str) {
        let key = normalize_token(variant);
        if !key.is_empty() {
            self.lookup.insert(key, canonical.to_string());
        }
    }

    /// Map a spelling only if it is not already known.
    pub fn add_if_absent(&mut self, variant: &str, canonical: &str) {
        let key = normalize_token(variant);
        if !key.is_empty() {
            self.lookup
                .entry(key)
                .or_insert_with(|| canonical.to_string());
        }
    }

    /// Learn team spellings from matchup-style episode names.
    pub fn extend_from_show(&mut self, show: &Show) {
        for (_, episode) in show.episodes() {
            for name in episode.names() {
                let Some((left, right)) = split_matchup(name) else {
                    continue;
                };
                for team in [left, right] {
                    let canonical = self.canonicalize(&team).unwrap_or_else(|| team.clone());
                    self.add_if_absent(&team, &canonical);
                    // "Boston Celtics" is also known as "Celtics".
                    let words: Vec<&str> = team.split_whitespace().collect();
                    if let [_, .., nickname] = words[..] {
                        if nickname.chars().count() >= 4 {
                            self.add_if_absent(nickname, &canonical);
                        }
                    }
                }
            }
        }
    }

    /// Canonical name for a spelling, if known.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let key = normalize_token(raw);
        if key.is_empty() {
            return None;
        }
        self.lookup.get(&key).cloned()
    }

    /// Canonical name, or the cleaned input when unknown.
    pub fn canonical_or_clean(&self, raw: &str) -> String {
        let cleaned = clean_team(raw);
        self.canonicalize(&cleaned)
            .or_else(|| self.canonicalize(raw))
            .unwrap_or(cleaned)
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// Split "A vs B", "A at B", "A @ B" into its two sides.
pub fn split_matchup(text: &str) -> Option<(String, String)> {
    let caps = MATCHUP.captures(text.trim())?;
    let left = caps[1].trim().to_string();
    let right = caps[2].trim().to_string();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, right))
}

/// Whether a word is quality, provider, or release noise.
pub fn is_team_noise(word: &str) -> bool {
    let lower = word.to_lowercase();
    lower.chars().all(|c| c.is_ascii_digit()) || TEAM_NOISE_WORDS.contains(&lower.as_str())
}

/// Drop leading numbers and trailing quality/provider/release words.
pub fn clean_team_words(words: &[String]) -> Vec<String> {
    let start = words
        .iter()
        .position(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(words.len());
    let mut end = words.len();
    while end > start && is_team_noise(&words[end - 1]) {
        end -= 1;
    }
    words[start..end].to_vec()
}

/// [`clean_team_words`] over a raw string, joined by single spaces.
pub fn clean_team(raw: &str) -> String {
    let words: Vec<String> = normalize_words(raw)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    clean_team_words(&words).join(" ")
}
