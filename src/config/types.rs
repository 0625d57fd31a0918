use serde::{Deserialize, Serialize};
use sportforged_matcher::{PatternDefinition, PatternLibrary, SportConfig, TeamAliasTable};
use sportforged_quality::{resolve_profile, QualityProfile, QualityProfileOverride};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global quality profile.
    #[serde(default)]
    pub quality: QualityProfile,

    /// Regex fragments layered over the built-in table.
    #[serde(default)]
    pub fragments: BTreeMap<String, String>,

    /// Reusable pattern lists, referenced by name from sports.
    #[serde(default)]
    pub pattern_sets: BTreeMap<String, Vec<PatternDefinition>>,

    /// Named team alias tables (canonical name -> spellings).
    #[serde(default)]
    pub team_aliases: BTreeMap<String, TeamAliasTable>,

    #[serde(default)]
    pub sports: Vec<SportEntry>,
}

impl Config {
    /// Shared definitions handed to every sport at compile time.
    pub fn library(&self) -> PatternLibrary {
        PatternLibrary {
            fragments: self.fragments.clone(),
            pattern_sets: self.pattern_sets.clone(),
            team_aliases: self.team_aliases.clone(),
        }
    }

    pub fn sport(&self, id: &str) -> Option<&SportEntry> {
        self.sports.iter().find(|entry| entry.sport.id == id)
    }

    pub fn enabled_sports(&self) -> impl Iterator<Item = &SportEntry> {
        self.sports.iter().filter(|entry| entry.sport.enabled)
    }
}

/// One `[[sports]]` entry: matching configuration plus host-side settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SportEntry {
    #[serde(flatten)]
    pub sport: SportConfig,

    /// Show snapshot (JSON) the sport matches against.
    #[serde(default)]
    pub show: Option<PathBuf>,

    /// Per-sport quality settings, merged field by field over the global profile.
    #[serde(default)]
    pub quality: Option<QualityProfileOverride>,
}

impl SportEntry {
    pub fn new(sport: SportConfig) -> Self {
        Self {
            sport,
            show: None,
            quality: None,
        }
    }

    /// The effective quality profile for this sport.
    pub fn quality_profile(&self, global: &QualityProfile) -> QualityProfile {
        resolve_profile(global, self.quality.as_ref())
    }
}
