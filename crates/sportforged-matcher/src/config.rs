//! Per-sport matching configuration.
//!
//! These types deserialize directly from the host's TOML configuration. A
//! [`PatternLibrary`] carries the shared pieces (fragments, pattern sets,
//! team alias tables) that individual [`SportConfig`]s reference by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Canonical team name mapped to its known spellings.
pub type TeamAliasTable = BTreeMap<String, Vec<String>>;

/// How a captured value is turned into a season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonMode {
    #[default]
    Round,
    Week,
    Key,
    Title,
    Sequential,
    Date,
    /// Any mode name this build does not recognize.
    #[serde(other)]
    Unknown,
}

impl SeasonMode {
    /// Capture group read when the selector names none.
    pub fn default_group(&self) -> &'static str {
        match self {
            SeasonMode::Round => "round",
            SeasonMode::Week => "week",
            SeasonMode::Date => "date",
            SeasonMode::Key | SeasonMode::Title | SeasonMode::Sequential | SeasonMode::Unknown => {
                "season"
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSelector {
    #[serde(default)]
    pub mode: SeasonMode,

    #[serde(default)]
    pub group: Option<String>,

    /// Added to numeric values before matching.
    #[serde(default)]
    pub offset: i64,

    /// Captured value -> season index (key mode) or round number (title mode).
    #[serde(default)]
    pub mapping: BTreeMap<String, i64>,

    /// Captured value -> season title (title mode).
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Interpolates `{group}` references instead of reading `group` directly.
    #[serde(default)]
    pub value_template: Option<String>,
}

impl SeasonSelector {
    pub fn group_name(&self) -> &str {
        self.group
            .as_deref()
            .unwrap_or_else(|| self.mode.default_group())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSelector {
    #[serde(default = "default_episode_group")]
    pub group: String,

    /// Used when the group is missing or empty.
    #[serde(default, rename = "default")]
    pub default_value: Option<String>,

    /// Scan the whole matched text for any known session title.
    #[serde(default)]
    pub allow_fallback_to_title: bool,
}

fn default_episode_group() -> String {
    "session".to_string()
}

impl Default for EpisodeSelector {
    fn default() -> Self {
        Self {
            group: default_episode_group(),
            default_value: None,
            allow_fallback_to_title: false,
        }
    }
}

/// One configured filename pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    /// Regular expression, possibly containing `<fragment>` references.
    pub regex: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub season_selector: SeasonSelector,

    #[serde(default)]
    pub episode_selector: EpisodeSelector,

    /// Canonical session name -> alias spellings.
    #[serde(default)]
    pub session_aliases: BTreeMap<String, Vec<String>>,

    /// Feature flags, e.g. `cross_season_fallback = true`.
    #[serde(default)]
    pub metadata_filters: BTreeMap<String, serde_json::Value>,

    /// Per-pattern destination template overrides, passed through to the caller.
    #[serde(default)]
    pub destination: BTreeMap<String, String>,

    /// Lower values are tried first.
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    100
}

impl PatternDefinition {
    /// Create a pattern with default selectors.
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            description: None,
            season_selector: SeasonSelector::default(),
            episode_selector: EpisodeSelector::default(),
            session_aliases: BTreeMap::new(),
            metadata_filters: BTreeMap::new(),
            destination: BTreeMap::new(),
            priority: default_priority(),
        }
    }

    /// Whether a boolean metadata filter is set.
    pub fn flag(&self, name: &str) -> bool {
        self.metadata_filters
            .get(name)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    pub fn cross_season_fallback(&self) -> bool {
        self.flag("cross_season_fallback")
    }

    /// Description if set, else the raw regex.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.regex)
    }
}

/// Matching configuration for one sport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportConfig {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Report misses as ignored instead of warnings.
    #[serde(default)]
    pub allow_unmatched: bool,

    /// Try the team/date structured path before configured patterns.
    #[serde(default = "default_true")]
    pub structured_matching: bool,

    /// Broadcaster or channel tags stripped from session values.
    #[serde(default)]
    pub noise_tokens: Vec<String>,

    /// Name of a shared team alias table.
    #[serde(default)]
    pub team_alias_table: Option<String>,

    /// Inline team aliases, merged over the named table.
    #[serde(default)]
    pub team_aliases: TeamAliasTable,

    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,

    /// Names of shared pattern sets appended to `patterns`.
    #[serde(default)]
    pub pattern_sets: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl SportConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            enabled: true,
            allow_unmatched: false,
            structured_matching: true,
            noise_tokens: Vec::new(),
            team_alias_table: None,
            team_aliases: TeamAliasTable::new(),
            patterns: Vec::new(),
            pattern_sets: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Shared definitions that sports reference by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternLibrary {
    /// User fragments, layered over the built-in fragment table.
    #[serde(default)]
    pub fragments: BTreeMap<String, String>,

    #[serde(default)]
    pub pattern_sets: BTreeMap<String, Vec<PatternDefinition>>,

    #[serde(default)]
    pub team_aliases: BTreeMap<String, TeamAliasTable>,
}

impl PatternLibrary {
    /// The sport's own patterns followed by every referenced pattern set.
    pub fn pattern_definitions(&self, sport: &SportConfig) -> Result<Vec<PatternDefinition>> {
        let mut definitions = sport.patterns.clone();
        for name in &sport.pattern_sets {
            let set = self
                .pattern_sets
                .get(name)
                .ok_or_else(|| Error::unknown_pattern_set(name))?;
            definitions.extend(set.iter().cloned());
        }
        Ok(definitions)
    }

    /// The named table merged with the sport's inline aliases.
    pub fn team_aliases_for(&self, sport: &SportConfig) -> Result<TeamAliasTable> {
        let mut table = match &sport.team_alias_table {
            Some(name) => self
                .team_aliases
                .get(name)
                .cloned()
                .ok_or_else(|| Error::unknown_team_alias_table(name))?,
            None => TeamAliasTable::new(),
        };
        for (canonical, variants) in &sport.team_aliases {
            table
                .entry(canonical.clone())
                .or_default()
                .extend(variants.iter().cloned());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pattern_defaults_from_json() {
        let pattern: PatternDefinition =
            serde_json::from_str(r#"{"regex": "(?P<session>.+)"}"#).unwrap();
        assert_eq!(pattern.priority, 100);
        assert_eq!(pattern.season_selector.mode, SeasonMode::Round);
        assert_eq!(pattern.season_selector.group_name(), "round");
        assert_eq!(pattern.episode_selector.group, "session");
        assert!(!pattern.cross_season_fallback());
    }

    #[test]
    fn test_unknown_mode_deserializes() {
        let selector: SeasonSelector = serde_json::from_str(r#"{"mode": "lunar"}"#).unwrap();
        assert_eq!(selector.mode, SeasonMode::Unknown);
    }

    #[test]
    fn test_metadata_flag() {
        let mut pattern = PatternDefinition::new("x");
        pattern
            .metadata_filters
            .insert("cross_season_fallback".to_string(), serde_json::Value::Bool(true));
        assert!(pattern.cross_season_fallback());
        assert!(!pattern.flag("missing"));
    }

    #[test]
    fn test_sport_defaults() {
        let sport: SportConfig = serde_json::from_str(r#"{"id": "f1"}"#).unwrap();
        assert!(sport.enabled);
        assert!(sport.structured_matching);
        assert!(!sport.allow_unmatched);
        assert_eq!(sport.display_name(), "f1");
    }

    #[test]
    fn test_pattern_sets_resolve() {
        let mut library = PatternLibrary::default();
        library
            .pattern_sets
            .insert("motorsport".to_string(), vec![PatternDefinition::new("b")]);

        let mut sport = SportConfig::new("f1");
        sport.patterns.push(PatternDefinition::new("a"));
        sport.pattern_sets.push("motorsport".to_string());
        let defs = library.pattern_definitions(&sport).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].regex, "b");

        sport.pattern_sets.push("missing".to_string());
        assert_matches!(
            library.pattern_definitions(&sport),
            Err(Error::UnknownPatternSet { name }) if name == "missing"
        );
    }

    #[test]
    fn test_team_alias_tables_merge() {
        let mut library = PatternLibrary::default();
        let mut nba = TeamAliasTable::new();
        nba.insert("Boston Celtics".to_string(), vec!["Celtics".to_string()]);
        library.team_aliases.insert("nba".to_string(), nba);

        let mut sport = SportConfig::new("nba");
        sport.team_alias_table = Some("nba".to_string());
        sport
            .team_aliases
            .insert("Boston Celtics".to_string(), vec!["BOS".to_string()]);

        let table = library.team_aliases_for(&sport).unwrap();
        assert_eq!(table["Boston Celtics"], vec!["Celtics", "BOS"]);

        sport.team_alias_table = Some("nhl".to_string());
        assert_matches!(
            library.team_aliases_for(&sport),
            Err(Error::UnknownTeamAliasTable { .. })
        );
    }
}
