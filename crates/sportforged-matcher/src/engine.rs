//! Match orchestration.
//!
//! A filename is tried against the structured team/date path first (when
//! the sport enables it), then against each compiled pattern in priority
//! order. The first pattern that yields both a season and an episode wins.

use parking_lot::RwLock;
use regex::Regex;
use sportforged_common::{Episode, Season, Show};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use crate::config::{PatternLibrary, SeasonMode, SportConfig};
use crate::episode::{resolve_episode, EpisodeRequest, EpisodeStrategy};
use crate::error::Result;
use crate::patterns::{compile_patterns, Captures, PatternRuntime};
use crate::season::{select_season, selector_value};
use crate::structured::{best_structured_match, parse_structured_filename, STRUCTURED_ACCEPT};
use crate::teams::TeamAliasResolver;
use crate::trace::{Diagnostic, LookupRecord, MatchAttempt, MatchOutcome, MatchTrace, Severity};

static SAMPLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])sample(?:$|[^a-z0-9])").expect("sample pattern is valid")
});

/// How a match was found.
#[derive(Debug, Clone)]
pub enum MatchMethod<'a> {
    Pattern {
        pattern: &'a PatternRuntime,
        strategy: EpisodeStrategy,
        /// The episode came from a season other than the selected one.
        cross_season: bool,
    },
    Structured {
        score: f64,
    },
}

impl MatchMethod<'_> {
    /// Short name recorded in traces and reports.
    pub fn name(&self) -> String {
        match self {
            MatchMethod::Pattern {
                cross_season: true,
                strategy,
                ..
            } => format!("pattern/cross_season/{}", strategy),
            MatchMethod::Pattern { strategy, .. } => format!("pattern/{}", strategy),
            MatchMethod::Structured { .. } => "structured".to_string(),
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            MatchMethod::Structured { score } => Some(*score),
            MatchMethod::Pattern { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub season: &'a Season,
    pub episode: &'a Episode,
    pub method: MatchMethod<'a>,
    /// Captured and synthesized groups, quality groups included.
    pub groups: BTreeMap<String, String>,
}

impl MatchResult<'_> {
    /// Destination overrides declared by the winning pattern.
    pub fn destination(&self) -> Option<&BTreeMap<String, String>> {
        match &self.method {
            MatchMethod::Pattern { pattern, .. } => Some(&pattern.definition.destination),
            MatchMethod::Structured { .. } => None,
        }
    }

    fn outcome(&self) -> MatchOutcome {
        MatchOutcome {
            season: self.season.key.clone(),
            episode: self.episode.title.clone(),
            method: self.method.name(),
            score: self.method.score(),
        }
    }
}

/// Optional sinks for diagnostics and traces.
struct Recorder<'r> {
    diagnostics: Option<&'r mut Vec<Diagnostic>>,
    trace: Option<&'r mut MatchTrace>,
    miss: Severity,
}

impl Recorder<'_> {
    fn diagnose(&mut self, severity: Severity, message: String) {
        if let Some(diagnostics) = self.diagnostics.as_deref_mut() {
            diagnostics.push(Diagnostic::new(severity, message));
        }
    }

    fn attempt(&mut self, attempt: MatchAttempt) {
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.attempts.push(attempt);
        }
    }

    fn lookups(&mut self, lookups: Vec<LookupRecord>) {
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.lookups.extend(lookups);
        }
    }

    fn finish<'a>(&mut self, result: MatchResult<'a>) -> Option<MatchResult<'a>> {
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.result = Some(result.outcome());
        }
        Some(result)
    }
}

/// Whether a filename is a sample clip.
pub fn is_sample(filename: &str) -> bool {
    SAMPLE_MARKER.is_match(filename)
}

/// Match one filename against a show.
///
/// `configured_teams` holds the sport's configured aliases; `show_teams`
/// holds those plus every spelling learned from the show. Misses are
/// reported through `diagnostics` and every step through `trace`.
#[allow(clippy::too_many_arguments)]
pub fn match_with_teams<'a>(
    filename: &str,
    sport: &SportConfig,
    show: &'a Show,
    patterns: &'a [PatternRuntime],
    configured_teams: Option<&TeamAliasResolver>,
    show_teams: &TeamAliasResolver,
    diagnostics: Option<&mut Vec<Diagnostic>>,
    trace: Option<&mut MatchTrace>,
) -> Option<MatchResult<'a>> {
    let miss = if sport.allow_unmatched || is_sample(filename) {
        Severity::Ignored
    } else {
        Severity::Warning
    };
    let mut recorder = Recorder {
        diagnostics,
        trace,
        miss,
    };

    if sport.structured_matching {
        if let Some(result) = try_structured(filename, show, show_teams, &mut recorder) {
            return recorder.finish(result);
        }
    } else {
        recorder.attempt(MatchAttempt::StructuredSkipped {
            reason: "disabled for sport".to_string(),
        });
    }

    let mut any_pattern_matched = false;
    for pattern in patterns {
        let label = pattern.definition.label().to_string();
        let Some(captures) = pattern.captures(filename) else {
            recorder.attempt(MatchAttempt::PatternNoMatch { pattern: label });
            continue;
        };
        any_pattern_matched = true;

        let selector = &pattern.definition.season_selector;
        if selector.mode == SeasonMode::Unknown {
            recorder.diagnose(
                Severity::Error,
                format!("Pattern '{}' has an unknown season selector mode", label),
            );
            recorder.attempt(MatchAttempt::SeasonUnresolved {
                pattern: label,
                value: None,
            });
            continue;
        }

        let Some(season) = select_season(show, selector, &captures.groups) else {
            let value = selector_value(selector, &captures.groups);
            recorder.diagnose(
                recorder.miss,
                format!(
                    "No season in '{}' for {} '{}'",
                    show.title,
                    selector.group_name(),
                    value.as_deref().unwrap_or("")
                ),
            );
            recorder.attempt(MatchAttempt::SeasonUnresolved {
                pattern: label,
                value,
            });
            continue;
        };

        if let Some(result) = resolve_in_season(
            pattern,
            sport,
            show,
            season,
            &captures,
            configured_teams,
            false,
            &mut recorder,
        ) {
            recorder.attempt(MatchAttempt::Matched {
                pattern: label,
                season: season.key.clone(),
                episode: result.episode.title.clone(),
            });
            return recorder.finish(result);
        }

        if pattern.definition.cross_season_fallback() {
            for other in show.seasons.iter().filter(|s| s.key != season.key) {
                if let Some(result) = resolve_in_season(
                    pattern,
                    sport,
                    show,
                    other,
                    &captures,
                    configured_teams,
                    true,
                    &mut recorder,
                ) {
                    recorder.attempt(MatchAttempt::CrossSeasonMatched {
                        pattern: label,
                        season: other.key.clone(),
                        episode: result.episode.title.clone(),
                    });
                    return recorder.finish(result);
                }
            }
        }

        let session = captures
            .groups
            .get(&pattern.definition.episode_selector.group)
            .cloned()
            .unwrap_or_default();
        recorder.diagnose(
            recorder.miss,
            format!("No episode in season '{}' for session '{}'", season.title, session),
        );
        recorder.attempt(MatchAttempt::EpisodeUnresolved {
            pattern: label,
            season: season.key.clone(),
        });
    }

    if !any_pattern_matched {
        recorder.diagnose(
            recorder.miss,
            format!("No {} pattern matched", sport.display_name()),
        );
    }
    tracing::debug!(filename, sport = %sport.id, "No match");
    None
}

/// Match one filename, building team resolvers for this call only.
///
/// [`SportMatcher`] caches the resolvers and should be preferred when
/// matching many files.
pub fn match_file_to_episode<'a>(
    filename: &str,
    sport: &SportConfig,
    show: &'a Show,
    patterns: &'a [PatternRuntime],
    diagnostics: Option<&mut Vec<Diagnostic>>,
    trace: Option<&mut MatchTrace>,
) -> Option<MatchResult<'a>> {
    let configured = (!sport.team_aliases.is_empty())
        .then(|| TeamAliasResolver::from_table(&sport.team_aliases));
    let show_teams = TeamAliasResolver::for_show(configured.as_ref(), show);
    match_with_teams(
        filename,
        sport,
        show,
        patterns,
        configured.as_ref(),
        &show_teams,
        diagnostics,
        trace,
    )
}

fn try_structured<'a>(
    filename: &str,
    show: &'a Show,
    resolver: &TeamAliasResolver,
    recorder: &mut Recorder<'_>,
) -> Option<MatchResult<'a>> {
    let Some(parsed) = parse_structured_filename(filename, show, resolver) else {
        recorder.attempt(MatchAttempt::StructuredSkipped {
            reason: "no matchup in filename".to_string(),
        });
        return None;
    };

    let best = best_structured_match(&parsed, show, resolver);
    let Some((season, episode, score)) = best.filter(|(_, _, s)| *s >= STRUCTURED_ACCEPT) else {
        recorder.attempt(MatchAttempt::StructuredRejected {
            best_score: best.map(|(_, _, s)| s),
        });
        return None;
    };

    recorder.attempt(MatchAttempt::StructuredMatched {
        season: season.key.clone(),
        episode: episode.title.clone(),
        score,
    });

    let mut groups = BTreeMap::new();
    if let Some(year) = parsed.year {
        groups.insert("year".to_string(), year.to_string());
    }
    if let Some(date) = parsed.date {
        groups.insert("date".to_string(), date.format("%Y-%m-%d").to_string());
    }
    if let Some(round) = parsed.round {
        groups.insert("round".to_string(), round.to_string());
    }
    if let [away, home] = &parsed.teams[..] {
        groups.insert("away".to_string(), away.clone());
        groups.insert("home".to_string(), home.clone());
        groups.insert("session".to_string(), format!("{} vs {}", away, home));
    }

    Some(MatchResult {
        season,
        episode,
        method: MatchMethod::Structured { score },
        groups,
    })
}

#[allow(clippy::too_many_arguments)]
fn resolve_in_season<'a>(
    pattern: &'a PatternRuntime,
    sport: &SportConfig,
    show: &'a Show,
    season: &'a Season,
    captures: &Captures,
    configured_teams: Option<&TeamAliasResolver>,
    cross_season: bool,
    recorder: &mut Recorder<'_>,
) -> Option<MatchResult<'a>> {
    let index = pattern.session_index(show, season);
    let request = EpisodeRequest {
        season,
        index: &index,
        selector: &pattern.definition.episode_selector,
        captures,
        noise_tokens: &sport.noise_tokens,
        teams: configured_teams,
        season_group: pattern.definition.season_selector.group_name(),
    };
    let mut lookups = Vec::new();
    let resolution = resolve_episode(&request, &mut lookups);
    recorder.lookups(lookups);

    let resolution = resolution?;
    Some(MatchResult {
        season,
        episode: resolution.episode,
        method: MatchMethod::Pattern {
            pattern,
            strategy: resolution.strategy,
            cross_season,
        },
        groups: resolution.groups,
    })
}

/// A sport's compiled patterns and team resolvers, shareable across threads.
///
/// Show-derived team resolvers are built on first use per show and cached.
#[derive(Debug)]
pub struct SportMatcher {
    sport: SportConfig,
    patterns: Vec<PatternRuntime>,
    configured_teams: Option<TeamAliasResolver>,
    show_teams: RwLock<HashMap<String, Arc<TeamAliasResolver>>>,
}

impl SportMatcher {
    /// Compile a sport against the shared library.
    ///
    /// Named team alias tables are merged into the sport's inline aliases.
    pub fn new(sport: &SportConfig, library: &PatternLibrary) -> Result<Self> {
        let mut sport = sport.clone();
        sport.team_aliases = library.team_aliases_for(&sport)?;
        let patterns = compile_patterns(&sport, library)?;
        let configured_teams = (!sport.team_aliases.is_empty())
            .then(|| TeamAliasResolver::from_table(&sport.team_aliases));

        tracing::info!(
            sport = %sport.id,
            patterns = patterns.len(),
            team_aliases = configured_teams.as_ref().map_or(0, TeamAliasResolver::len),
            "Compiled sport matcher"
        );

        Ok(Self {
            sport,
            patterns,
            configured_teams,
            show_teams: RwLock::new(HashMap::new()),
        })
    }

    pub fn sport(&self) -> &SportConfig {
        &self.sport
    }

    pub fn patterns(&self) -> &[PatternRuntime] {
        &self.patterns
    }

    fn show_teams(&self, show: &Show) -> Arc<TeamAliasResolver> {
        if let Some(resolver) = self.show_teams.read().get(&show.key) {
            return Arc::clone(resolver);
        }
        let built = Arc::new(TeamAliasResolver::for_show(
            self.configured_teams.as_ref(),
            show,
        ));
        let mut cache = self.show_teams.write();
        Arc::clone(cache.entry(show.key.clone()).or_insert(built))
    }

    pub fn match_file<'a>(
        &'a self,
        filename: &str,
        show: &'a Show,
        diagnostics: Option<&mut Vec<Diagnostic>>,
        trace: Option<&mut MatchTrace>,
    ) -> Option<MatchResult<'a>> {
        let show_teams = self.show_teams(show);
        match_with_teams(
            filename,
            &self.sport,
            show,
            &self.patterns,
            self.configured_teams.as_ref(),
            &show_teams,
            diagnostics,
            trace,
        )
    }
}
