//! Shared fixtures for integration tests.
//!
//! Provides small F1 and NBA show trees, matching sport configs, and a
//! config file template that points at show snapshots on disk.

#![allow(dead_code)]

use sportforged_common::Show;
use sportforged_matcher::{PatternDefinition, SportConfig};
use std::path::{Path, PathBuf};

/// Weekend-session filenames: `F1.<year>.R<round>.<location>[.GP].<session>[.<quality>][...].<ext>`.
pub const F1_PATTERN: &str = r"^F1<sep><year><sep><round><sep>(?P<location>[A-Za-z]+)<sep>(?:GP<sep>)?(?P<session>.+?)(?:<sep><quality>)?(?:<sep>.*)?<ext>";

pub const F1_SHOW_JSON: &str = r#"{
    "key": "formula-1-2026",
    "title": "Formula 1 2026",
    "seasons": [
        {
            "key": "r04",
            "title": "Miami Grand Prix",
            "round_number": 4,
            "episodes": [
                {"title": "Sprint", "originally_available": "2026-05-02"},
                {"title": "Qualifying", "originally_available": "2026-05-02"},
                {"title": "Race", "originally_available": "2026-05-03"}
            ]
        },
        {
            "key": "r05",
            "title": "Monaco Grand Prix",
            "round_number": 5,
            "episodes": [
                {"title": "Free Practice 1", "aliases": ["FP1"], "originally_available": "2026-05-22"},
                {"title": "Qualifying", "originally_available": "2026-05-23"},
                {"title": "Race", "aliases": ["Grand Prix"], "originally_available": "2026-05-24"}
            ]
        }
    ]
}"#;

pub const NBA_SHOW_JSON: &str = r#"{
    "key": "nba-2024-25",
    "title": "NBA 2024-25",
    "seasons": [
        {
            "key": "2024-12",
            "title": "December 2024",
            "episodes": [
                {"title": "Knicks vs Nets", "originally_available": "2024-12-20"},
                {"title": "Celtics vs Heat", "originally_available": "2024-12-22"}
            ]
        }
    ]
}"#;

pub fn f1_show() -> Show {
    Show::from_json(F1_SHOW_JSON).expect("F1 fixture is valid")
}

pub fn nba_show() -> Show {
    Show::from_json(NBA_SHOW_JSON).expect("NBA fixture is valid")
}

pub fn f1_pattern(priority: i32) -> PatternDefinition {
    let mut pattern = PatternDefinition::new(F1_PATTERN);
    pattern.description = Some("F1 weekend session".to_string());
    pattern.priority = priority;
    pattern
}

pub fn f1_sport() -> SportConfig {
    let mut sport = SportConfig::new("f1");
    sport.name = Some("Formula 1".to_string());
    sport.structured_matching = false;
    sport.noise_tokens = vec!["F1TV".to_string(), "Sky Sports".to_string()];
    sport.patterns = vec![f1_pattern(10)];
    sport
}

pub fn nba_sport() -> SportConfig {
    let mut sport = SportConfig::new("nba");
    sport.name = Some("NBA".to_string());
    sport
}

/// Write a fixture file into `dir` and return its path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

/// A complete configuration referencing show snapshots at the given paths.
pub fn config_toml(f1_show: &Path, nba_show: &Path) -> String {
    format!(
        r#"
[quality]
cutoff = 500

[fragments]
gp = "(?:GP|Grand[ ._-]Prix)"

[[pattern_sets.formula]]
regex = '^F1<sep><year><sep><round><sep>(?P<location>[A-Za-z]+)<sep>(?:<gp><sep>)?(?P<session>.+?)(?:<sep><quality>)?(?:<sep>.*)?<ext>'
description = "F1 weekend session"
priority = 10

[pattern_sets.formula.season_selector]
mode = "round"

[team_aliases.nba]
"Boston Celtics" = ["Celtics", "BOS"]
"Miami Heat" = ["Heat", "MIA"]

[[sports]]
id = "f1"
name = "Formula 1"
show = {f1:?}
pattern_sets = ["formula"]
noise_tokens = ["F1TV", "Sky Sports"]
structured_matching = false

[sports.quality]
min_score = 200

[[sports]]
id = "nba"
name = "NBA"
show = {nba:?}
team_alias_table = "nba"
"#,
        f1 = f1_show.to_string_lossy(),
        nba = nba_show.to_string_lossy(),
    )
}
