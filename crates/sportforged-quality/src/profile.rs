//! Scoring tables and quality profiles.
//!
//! A global [`QualityProfile`] is overlaid field-by-field with an optional
//! per-sport [`QualityProfileOverride`] through [`resolve_profile`].

use std::collections::BTreeMap;

/// Points awarded per attribute plus revision and HDR bonuses.
///
/// Table keys are lowercase; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringTable {
    pub resolutions: BTreeMap<String, i64>,
    pub sources: BTreeMap<String, i64>,
    pub release_groups: BTreeMap<String, i64>,
    pub proper_bonus: i64,
    pub repack_bonus: i64,
    pub hdr_bonus: i64,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            resolutions: default_resolution_points(),
            sources: default_source_points(),
            release_groups: default_release_group_points(),
            proper_bonus: 50,
            repack_bonus: 50,
            hdr_bonus: 25,
        }
    }
}

fn default_resolution_points() -> BTreeMap<String, i64> {
    table(&[
        ("2160p", 400),
        ("1080p", 300),
        ("720p", 200),
        ("576p", 150),
        ("480p", 100),
    ])
}

fn default_source_points() -> BTreeMap<String, i64> {
    table(&[
        ("bluray", 100),
        ("webdl", 90),
        ("webrip", 70),
        ("hdtv", 50),
        ("sdtv", 30),
        ("dvdrip", 40),
    ])
}

fn default_release_group_points() -> BTreeMap<String, i64> {
    table(&[("mwr", 50), ("smcgill1969", 40), ("egortech", 30)])
}

fn table(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
    entries
        .iter()
        .map(|(key, points)| (key.to_string(), *points))
        .collect()
}

impl ScoringTable {
    /// Case-insensitive lookup in one of the point tables, 0 when absent.
    pub fn points(table: &BTreeMap<String, i64>, key: &str) -> i64 {
        let lower = key.to_lowercase();
        table
            .get(&lower)
            .copied()
            .or_else(|| {
                table
                    .iter()
                    .find(|(k, _)| k.to_lowercase() == lower)
                    .map(|(_, v)| *v)
            })
            .unwrap_or(0)
    }
}

/// How filenames are scored and when a new file replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QualityProfile {
    pub enabled: bool,
    pub scoring: ScoringTable,
    /// Once an existing file scores at least this much, only PROPER/REPACK replace it.
    pub cutoff: Option<i64>,
    /// New files scoring below this are never accepted.
    pub min_score: Option<i64>,
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self {
            enabled: true,
            scoring: ScoringTable::default(),
            cutoff: None,
            min_score: None,
        }
    }
}

/// Partial scoring table; map entries are merged into the global maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringOverride {
    pub resolutions: BTreeMap<String, i64>,
    pub sources: BTreeMap<String, i64>,
    pub release_groups: BTreeMap<String, i64>,
    pub proper_bonus: Option<i64>,
    pub repack_bonus: Option<i64>,
    pub hdr_bonus: Option<i64>,
}

/// Sport-level profile; unset fields inherit from the global profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QualityProfileOverride {
    pub enabled: Option<bool>,
    pub scoring: ScoringOverride,
    pub cutoff: Option<i64>,
    pub min_score: Option<i64>,
}

/// Merge a sport override over the global profile, sport values winning.
///
/// # Examples
///
/// ```
/// use sportforged_quality::{resolve_profile, QualityProfile, QualityProfileOverride};
///
/// let global = QualityProfile { cutoff: Some(400), ..Default::default() };
/// let sport = QualityProfileOverride { min_score: Some(200), ..Default::default() };
/// let merged = resolve_profile(&global, Some(&sport));
/// assert_eq!(merged.cutoff, Some(400));
/// assert_eq!(merged.min_score, Some(200));
/// ```
pub fn resolve_profile(
    global: &QualityProfile,
    sport: Option<&QualityProfileOverride>,
) -> QualityProfile {
    let mut merged = global.clone();
    let Some(sport) = sport else {
        return merged;
    };

    if let Some(enabled) = sport.enabled {
        merged.enabled = enabled;
    }
    if sport.cutoff.is_some() {
        merged.cutoff = sport.cutoff;
    }
    if sport.min_score.is_some() {
        merged.min_score = sport.min_score;
    }

    let scoring = &sport.scoring;
    overlay(&mut merged.scoring.resolutions, &scoring.resolutions);
    overlay(&mut merged.scoring.sources, &scoring.sources);
    overlay(&mut merged.scoring.release_groups, &scoring.release_groups);
    if let Some(bonus) = scoring.proper_bonus {
        merged.scoring.proper_bonus = bonus;
    }
    if let Some(bonus) = scoring.repack_bonus {
        merged.scoring.repack_bonus = bonus;
    }
    if let Some(bonus) = scoring.hdr_bonus {
        merged.scoring.hdr_bonus = bonus;
    }

    merged
}

fn overlay(base: &mut BTreeMap<String, i64>, extra: &BTreeMap<String, i64>) {
    for (key, points) in extra {
        base.insert(key.to_lowercase(), *points);
    }
}
