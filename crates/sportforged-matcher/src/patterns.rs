//! Pattern compilation.

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use sportforged_common::{Season, Show};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::{PatternDefinition, PatternLibrary, SportConfig};
use crate::error::{Error, Result};
use crate::fragments::FragmentTable;
use crate::lookup::SessionLookupIndex;

/// A compiled pattern with its lazily built per-season lookup indexes.
///
/// Indexes are immutable once built and shared between threads.
#[derive(Debug)]
pub struct PatternRuntime {
    pub definition: PatternDefinition,
    pub regex: Regex,
    indexes: RwLock<HashMap<(String, String), Arc<SessionLookupIndex>>>,
}

impl PatternRuntime {
    pub fn new(definition: PatternDefinition, regex: Regex) -> Self {
        Self {
            definition,
            regex,
            indexes: RwLock::new(HashMap::new()),
        }
    }

    pub fn priority(&self) -> i32 {
        self.definition.priority
    }

    /// Named groups captured from the filename, if the pattern matches.
    pub fn captures(&self, filename: &str) -> Option<Captures> {
        let caps = self.regex.captures(filename)?;
        let mut groups = BTreeMap::new();
        for name in self.regex.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                groups.insert(name.to_string(), m.as_str().to_string());
            }
        }
        let full_text = caps
            .get(0)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Some(Captures { groups, full_text })
    }

    /// Session lookup index for a season, built on first use.
    pub fn session_index(&self, show: &Show, season: &Season) -> Arc<SessionLookupIndex> {
        let key = (show.key.clone(), season.key.clone());
        if let Some(index) = self.indexes.read().get(&key) {
            return Arc::clone(index);
        }
        let built = Arc::new(SessionLookupIndex::build(
            season,
            &self.definition.session_aliases,
        ));
        let mut indexes = self.indexes.write();
        Arc::clone(indexes.entry(key).or_insert(built))
    }

    /// Number of cached season indexes.
    pub fn cached_indexes(&self) -> usize {
        self.indexes.read().len()
    }
}

/// Groups captured by one pattern match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    pub groups: BTreeMap<String, String>,
    /// The entire matched text.
    pub full_text: String,
}

/// Compile a sport's patterns, lowest priority value first.
///
/// Fragment cycles, unknown fragments, unknown pattern sets, and invalid
/// expressions are all reported here, before any filename is processed.
pub fn compile_patterns(
    sport: &SportConfig,
    library: &PatternLibrary,
) -> Result<Vec<PatternRuntime>> {
    let mut fragments = FragmentTable::new(&library.fragments);
    fragments.resolve_all()?;

    let mut definitions = library.pattern_definitions(sport)?;
    definitions.sort_by_key(|d| d.priority);

    let mut compiled = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let expanded = fragments.expand(&definition.regex)?;
        let regex = RegexBuilder::new(&expanded)
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::InvalidRegex {
                pattern: definition.regex.clone(),
                source,
            })?;
        tracing::debug!(
            sport = %sport.id,
            priority = definition.priority,
            pattern = %definition.label(),
            "Compiled pattern"
        );
        compiled.push(PatternRuntime::new(definition, regex));
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sport(patterns: Vec<PatternDefinition>) -> SportConfig {
        let mut sport = SportConfig::new("f1");
        sport.patterns = patterns;
        sport
    }

    fn pattern(regex: &str, priority: i32) -> PatternDefinition {
        let mut def = PatternDefinition::new(regex);
        def.priority = priority;
        def
    }

    #[test]
    fn test_sorted_by_priority_stable() {
        let compiled = compile_patterns(
            &sport(vec![pattern("c", 50), pattern("a", 10), pattern("b", 50)]),
            &PatternLibrary::default(),
        )
        .unwrap();
        let order: Vec<&str> = compiled.iter().map(|p| p.definition.regex.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_fragments_expanded_and_case_insensitive() {
        let compiled = compile_patterns(
            &sport(vec![pattern(r"^f1<sep><year><sep><round>", 1)]),
            &PatternLibrary::default(),
        )
        .unwrap();
        let caps = compiled[0].captures("F1.2026.R05.Monaco").unwrap();
        assert_eq!(caps.groups["year"], "2026");
        assert_eq!(caps.groups["round"], "05");
        assert_eq!(caps.full_text, "F1.2026.R05");
        assert!(compiled[0].captures("MotoGP.2026").is_none());
    }

    #[test]
    fn test_invalid_regex_is_fatal() {
        assert_matches!(
            compile_patterns(&sport(vec![pattern("(unclosed", 1)]), &PatternLibrary::default()),
            Err(Error::InvalidRegex { pattern, .. }) if pattern == "(unclosed"
        );
    }

    #[test]
    fn test_fragment_cycle_is_fatal_even_if_unused() {
        let mut library = PatternLibrary::default();
        library.fragments.insert("a".to_string(), "<b>".to_string());
        library.fragments.insert("b".to_string(), "<a>".to_string());
        assert_matches!(
            compile_patterns(&sport(vec![pattern("x", 1)]), &library),
            Err(Error::FragmentCycle { .. })
        );
    }

    #[test]
    fn test_session_index_cached() {
        let compiled = compile_patterns(&sport(vec![pattern("x", 1)]), &PatternLibrary::default())
            .unwrap();
        let show = Show::from_json(
            r#"{"key": "f1", "title": "F1", "seasons": [{"key": "r1", "title": "R1", "episodes": [{"title": "Race"}]}]}"#,
        )
        .unwrap();
        let first = compiled[0].session_index(&show, &show.seasons[0]);
        let second = compiled[0].session_index(&show, &show.seasons[0]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(compiled[0].cached_indexes(), 1);
        assert_eq!(first.get("race"), Some("Race"));
    }
}
