//! Episode resolution within a selected season.
//!
//! Strategies run in a fixed order and the first success wins:
//!
//! 1. lookup variants built from the captured groups, longest first
//! 2. a scan of the whole matched text for known titles (opt-in)
//! 3. round number plus location
//! 4. closest air date
//!
//! The order decides which of several plausible episodes is returned, so it
//! must not change between runs.

use chrono::NaiveDate;
use regex::Regex;
use sportforged_common::text::{normalize_token, normalize_words, parse_loose_int};
use sportforged_common::{Episode, Season};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use crate::config::EpisodeSelector;
use crate::dates::{date_from_groups, days_apart, reference_year, within_proximity};
use crate::lookup::{resolve_session_lookup, SessionLookupIndex};
use crate::patterns::Captures;
use crate::similarity;
use crate::teams::{clean_team, TeamAliasResolver};
use crate::trace::LookupRecord;

/// Groups that describe the season, the date, or the release rather than the session.
const NON_SESSION_GROUPS: &[&str] = &[
    "season", "round", "week", "year", "month", "day", "date", "quality", "resolution",
    "source", "codec", "hdr", "release_group", "group", "ext", "separator",
];

/// Separators tried between away and home teams, after any observed one.
const COMMON_SEPARATORS: &[&str] = &["at", "vs", "v", "@"];

/// Minimum partial-match score for a location to pick a round episode.
const LOCATION_ACCEPT: f64 = 80.0;

static PART_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"part\d+").expect("part pattern is valid"));

/// Everything the resolver needs for one (pattern, season) attempt.
///
/// The season outlives the request so that resolutions can be returned
/// after the per-attempt index handle is dropped.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRequest<'r, 's> {
    pub season: &'s Season,
    pub index: &'r SessionLookupIndex,
    pub selector: &'r EpisodeSelector,
    pub captures: &'r Captures,
    pub noise_tokens: &'r [String],
    /// Configured team aliases, when the sport has any.
    pub teams: Option<&'r TeamAliasResolver>,
    /// The group the season selector consumed.
    pub season_group: &'r str,
}

/// Which strategy found the episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeStrategy {
    Lookup { label: String },
    TitleScan,
    RoundLocation,
    DateProximity,
}

impl std::fmt::Display for EpisodeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeStrategy::Lookup { label } => write!(f, "lookup:{}", label),
            EpisodeStrategy::TitleScan => write!(f, "title_scan"),
            EpisodeStrategy::RoundLocation => write!(f, "round_location"),
            EpisodeStrategy::DateProximity => write!(f, "date_proximity"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EpisodeResolution<'a> {
    pub episode: &'a Episode,
    pub strategy: EpisodeStrategy,
    /// Captured groups plus synthesized values such as canonical teams.
    pub groups: BTreeMap<String, String>,
}

/// One candidate spelling of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupVariant {
    pub label: String,
    pub raw: String,
    pub normalized: String,
}

/// Lowercase, drop noise words, and strip everything but letters and digits.
pub fn normalize_session(value: &str, noise_tokens: &[String]) -> String {
    let mut text = format!(" {} ", normalize_words(value));
    for noise in noise_tokens {
        let noise = normalize_words(noise);
        if noise.is_empty() {
            continue;
        }
        let needle = format!(" {} ", noise);
        while text.contains(&needle) {
            text = text.replace(&needle, " ");
        }
    }
    normalize_token(&text)
}

/// `racepart2` -> `race`.
pub fn strip_part_suffix(normalized: &str) -> Option<String> {
    if !PART_SUFFIX.is_match(normalized) {
        return None;
    }
    let stripped = PART_SUFFIX.replace_all(normalized, "").into_owned();
    if stripped.is_empty() || stripped == normalized {
        None
    } else {
        Some(stripped)
    }
}

/// Canonicalize away/home teams and, when both resolve, rewrite the session
/// as `"{away} vs {home}"`.
pub fn prepare_groups(
    groups: &BTreeMap<String, String>,
    session_group: &str,
    teams: Option<&TeamAliasResolver>,
) -> BTreeMap<String, String> {
    let mut prepared = groups.clone();
    let (Some(away), Some(home), Some(resolver)) = (groups.get("away"), groups.get("home"), teams)
    else {
        return prepared;
    };
    let away = resolver
        .canonicalize(&clean_team(away))
        .or_else(|| resolver.canonicalize(away));
    let home = resolver
        .canonicalize(&clean_team(home))
        .or_else(|| resolver.canonicalize(home));
    if let (Some(away), Some(home)) = (away, home) {
        prepared.insert(session_group.to_string(), format!("{} vs {}", away, home));
        prepared.insert("away".to_string(), away);
        prepared.insert("home".to_string(), home);
    }
    prepared
}

/// Build every lookup variant, deduplicated and ordered longest first.
pub fn lookup_variants(
    original: &BTreeMap<String, String>,
    prepared: &BTreeMap<String, String>,
    selector: &EpisodeSelector,
    season_group: &str,
    noise_tokens: &[String],
) -> Vec<LookupVariant> {
    let mut raw: Vec<(String, String)> = Vec::new();

    let session = prepared
        .get(&selector.group)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .or_else(|| selector.default_value.clone());
    if let Some(session) = &session {
        raw.push(("session".to_string(), session.clone()));
    }

    for (name, value) in original {
        if name == &selector.group
            || name == season_group
            || NON_SESSION_GROUPS.contains(&name.as_str())
            || value.trim().is_empty()
        {
            continue;
        }
        raw.push((name.clone(), value.clone()));
    }

    if let (Some(away), Some(home)) = (original.get("away"), original.get("home")) {
        let mut separators: Vec<String> = Vec::new();
        if let Some(observed) = original.get("separator") {
            separators.push(observed.trim().to_lowercase());
        }
        separators.extend(COMMON_SEPARATORS.iter().map(|s| s.to_string()));

        let mut sides = vec![(clean_team(away), clean_team(home))];
        if let (Some(a), Some(h)) = (prepared.get("away"), prepared.get("home")) {
            sides.push((a.clone(), h.clone()));
        }
        for (a, h) in sides {
            for (first, second) in [(&a, &h), (&h, &a)] {
                for sep in &separators {
                    raw.push(("matchup".to_string(), format!("{} {} {}", first, sep, second)));
                }
            }
        }
    }

    if let (Some(venue), Some(session)) = (
        original.get("venue").or_else(|| original.get("location")),
        &session,
    ) {
        raw.push(("venue_session".to_string(), format!("{} {}", venue, session)));
        raw.push(("session_venue".to_string(), format!("{} {}", session, venue)));
    }

    let mut seen = HashSet::new();
    let mut variants = Vec::new();
    for (label, value) in raw {
        let normalized = normalize_session(&value, noise_tokens);
        if normalized.is_empty() {
            continue;
        }
        let without_part = strip_part_suffix(&normalized);
        if seen.insert(normalized.clone()) {
            variants.push(LookupVariant {
                label: label.clone(),
                raw: value.clone(),
                normalized,
            });
        }
        if let Some(stripped) = without_part {
            if seen.insert(stripped.clone()) {
                variants.push(LookupVariant {
                    label: format!("{}_without_part", label),
                    raw: value,
                    normalized: stripped,
                });
            }
        }
    }

    // Stable: equal lengths keep discovery order.
    variants.sort_by(|a, b| b.normalized.chars().count().cmp(&a.normalized.chars().count()));
    variants
}

/// Episodes whose title or alias normalizes (directly or through the
/// index) to `target`, in season order.
fn episodes_named<'a>(
    season: &'a Season,
    index: &SessionLookupIndex,
    target: &str,
) -> Vec<&'a Episode> {
    season
        .episodes
        .iter()
        .filter(|episode| {
            episode.names().any(|name| {
                normalize_token(name) == target
                    || index
                        .get(name)
                        .is_some_and(|canonical| normalize_token(canonical) == target)
            })
        })
        .collect()
}

enum Pick<'a> {
    Found(&'a Episode),
    Ambiguous,
}

/// Choose among same-named candidates using the parsed date, if any.
fn pick_candidate<'a>(candidates: &[&'a Episode], date: Option<NaiveDate>) -> Pick<'a> {
    if let Some(date) = date {
        if let Some(closest) = closest_by_date(candidates.iter().copied(), date) {
            return Pick::Found(closest);
        }
        if let [only] = candidates {
            if only.originally_available.is_none() {
                return Pick::Found(*only);
            }
        }
        return Pick::Ambiguous;
    }
    match candidates {
        [only] => Pick::Found(*only),
        _ => Pick::Ambiguous,
    }
}

/// Closest episode within the proximity window; ties keep the earliest.
fn closest_by_date<'a>(
    episodes: impl Iterator<Item = &'a Episode>,
    date: NaiveDate,
) -> Option<&'a Episode> {
    let mut best: Option<(i64, &Episode)> = None;
    for episode in episodes {
        let Some(aired) = episode.originally_available else {
            continue;
        };
        if !within_proximity(date, aired) {
            continue;
        }
        let distance = days_apart(date, aired);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, episode));
        }
    }
    best.map(|(_, episode)| episode)
}

/// Resolve one episode, recording every lookup variant tried.
pub fn resolve_episode<'s>(
    request: &EpisodeRequest<'_, 's>,
    lookups: &mut Vec<LookupRecord>,
) -> Option<EpisodeResolution<'s>> {
    let season = request.season;
    let original = &request.captures.groups;
    let groups = prepare_groups(original, &request.selector.group, request.teams);
    let date = date_from_groups(&groups, reference_year(&groups, &season.title));

    let found = |episode: &'s Episode, strategy: EpisodeStrategy| EpisodeResolution {
        episode,
        strategy,
        groups: groups.clone(),
    };

    let variants = lookup_variants(
        original,
        &groups,
        request.selector,
        request.season_group,
        request.noise_tokens,
    );
    for variant in &variants {
        let canonical = resolve_session_lookup(request.index, &variant.normalized);
        lookups.push(LookupRecord {
            label: variant.label.clone(),
            value: variant.raw.clone(),
            normalized: variant.normalized.clone(),
            canonical: canonical.clone(),
        });

        let mut targets: Vec<String> = Vec::with_capacity(2);
        if let Some(canonical) = &canonical {
            targets.push(normalize_token(canonical));
        }
        if !targets.contains(&variant.normalized) {
            targets.push(variant.normalized.clone());
        }

        for target in &targets {
            let candidates = episodes_named(season, request.index, target);
            if candidates.is_empty() {
                continue;
            }
            match pick_candidate(&candidates, date) {
                Pick::Found(episode) => {
                    return Some(found(
                        episode,
                        EpisodeStrategy::Lookup {
                            label: variant.label.clone(),
                        },
                    ));
                }
                Pick::Ambiguous => {
                    tracing::debug!(
                        season = %season.key,
                        variant = %variant.normalized,
                        candidates = candidates.len(),
                        "Ambiguous session lookup"
                    );
                    return None;
                }
            }
        }
    }

    if request.selector.allow_fallback_to_title {
        if let Some(episode) = title_scan(request, date) {
            return Some(found(episode, EpisodeStrategy::TitleScan));
        }
    }

    if let Some(episode) = round_location(season, &groups) {
        return Some(found(episode, EpisodeStrategy::RoundLocation));
    }

    if let Some(date) = date {
        if let Some(episode) = closest_by_date(season.episodes.iter(), date) {
            return Some(found(episode, EpisodeStrategy::DateProximity));
        }
    }

    None
}

/// Look for any known session name inside the full matched text, longest first.
fn title_scan<'s>(
    request: &EpisodeRequest<'_, 's>,
    date: Option<NaiveDate>,
) -> Option<&'s Episode> {
    let text = normalize_session(&request.captures.full_text, request.noise_tokens);
    if text.is_empty() {
        return None;
    }

    let mut known: Vec<(String, String)> = request
        .season
        .episodes
        .iter()
        .flat_map(|episode| {
            episode
                .names()
                .map(move |name| (normalize_token(name), episode.title.clone()))
        })
        .chain(
            request
                .index
                .iter()
                .map(|(key, canonical)| (key.to_string(), canonical.to_string())),
        )
        .filter(|(key, _)| key.chars().count() >= 3 && text.contains(key.as_str()))
        .collect();
    known.sort_by(|a, b| {
        b.0.chars()
            .count()
            .cmp(&a.0.chars().count())
            .then_with(|| a.0.cmp(&b.0))
    });

    for (_, canonical) in known {
        let candidates = episodes_named(request.season, request.index, &normalize_token(&canonical));
        if candidates.is_empty() {
            continue;
        }
        if let Pick::Found(episode) = pick_candidate(&candidates, date) {
            return Some(episode);
        }
    }
    None
}

/// Episode whose position or display number equals the captured round,
/// preferring one whose title mentions the captured location.
fn round_location<'a>(season: &'a Season, groups: &BTreeMap<String, String>) -> Option<&'a Episode> {
    let round = groups
        .get("round")
        .and_then(|v| parse_loose_int(v))
        .and_then(|r| u32::try_from(r).ok())?;
    let candidates: Vec<&Episode> = season
        .episodes
        .iter()
        .filter(|e| e.index == round || e.display_number == Some(round))
        .collect();
    let first = *candidates.first()?;

    let Some(location) = groups.get("location").or_else(|| groups.get("venue")) else {
        return Some(first);
    };
    let location_token = normalize_token(location);
    if location_token.is_empty() {
        return Some(first);
    }
    if let Some(exact) = candidates
        .iter()
        .find(|e| normalize_token(&e.title).contains(&location_token))
    {
        return Some(*exact);
    }
    let location_words = normalize_words(location);
    let fuzzy = candidates.iter().find(|e| {
        similarity::partial_ratio(&location_words, &normalize_words(&e.title)) >= LOCATION_ACCEPT
    });
    Some(fuzzy.copied().unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(title: &str, aliases: &[&str], date: Option<(i32, u32, u32)>) -> Episode {
        Episode {
            title: title.to_string(),
            summary: None,
            originally_available: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            index: 0,
            display_number: None,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            metadata: Default::default(),
        }
    }

    fn season(title: &str, mut episodes: Vec<Episode>) -> Season {
        for (i, e) in episodes.iter_mut().enumerate() {
            e.index = i as u32 + 1;
        }
        Season {
            key: "s".to_string(),
            title: title.to_string(),
            summary: None,
            index: 0,
            sort_title: None,
            display_number: None,
            round_number: Some(5),
            episodes,
            metadata: Default::default(),
        }
    }

    fn captures(entries: &[(&str, &str)], full_text: &str) -> Captures {
        Captures {
            groups: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            full_text: full_text.to_string(),
        }
    }

    fn resolve<'a>(
        season: &'a Season,
        selector: &EpisodeSelector,
        captures: &Captures,
        teams: Option<&TeamAliasResolver>,
    ) -> (Option<EpisodeResolution<'a>>, Vec<LookupRecord>) {
        let index = SessionLookupIndex::build(season, &BTreeMap::new());
        let noise = vec!["Sky Sports".to_string(), "F1TV".to_string()];
        let request = EpisodeRequest {
            season,
            index: &index,
            selector,
            captures,
            noise_tokens: &noise,
            teams,
            season_group: "round",
        };
        let mut lookups = Vec::new();
        let result = resolve_episode(&request, &mut lookups);
        (result, lookups)
    }

    fn monaco() -> Season {
        season(
            "Monaco Grand Prix 2026",
            vec![
                episode("Free Practice 1", &["FP1"], Some((2026, 5, 22))),
                episode("Qualifying", &[], Some((2026, 5, 23))),
                episode("Race", &["Grand Prix"], Some((2026, 5, 24))),
            ],
        )
    }

    #[test]
    fn test_normalize_session_noise() {
        let noise = vec!["Sky Sports".to_string(), "F1TV".to_string()];
        assert_eq!(normalize_session("Sky.Sports.Race", &noise), "race");
        assert_eq!(normalize_session("F1TV Qualifying F1TV", &noise), "qualifying");
        assert_eq!(normalize_session("Skyline Race", &noise), "skylinerace");
    }

    #[test]
    fn test_strip_part_suffix() {
        assert_eq!(strip_part_suffix("racepart2").as_deref(), Some("race"));
        assert_eq!(strip_part_suffix("race"), None);
        assert_eq!(strip_part_suffix("part1"), None);
    }

    #[test]
    fn test_variants_sorted_longest_first() {
        let groups: BTreeMap<String, String> = [
            ("session", "Race"),
            ("location", "Monaco"),
            ("round", "05"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let variants =
            lookup_variants(&groups, &groups, &EpisodeSelector::default(), "round", &[]);
        let normalized: Vec<&str> = variants.iter().map(|v| v.normalized.as_str()).collect();
        assert_eq!(normalized, vec!["monacorace", "racemonaco", "monaco", "race"]);
    }

    #[test]
    fn test_resolves_via_generic_alias() {
        let season = monaco();
        let (result, lookups) = resolve(
            &season,
            &EpisodeSelector::default(),
            &captures(&[("session", "GP"), ("round", "05")], ""),
            None,
        );
        let result = result.unwrap();
        assert_eq!(result.episode.title, "Race");
        assert_eq!(lookups[0].canonical.as_deref(), Some("Race"));
    }

    #[test]
    fn test_fuzzy_session() {
        let season = monaco();
        let (result, _) = resolve(
            &season,
            &EpisodeSelector::default(),
            &captures(&[("session", "Qualifyng")], ""),
            None,
        );
        assert_eq!(result.unwrap().episode.title, "Qualifying");
    }

    #[test]
    fn test_default_session_value() {
        let season = monaco();
        let selector = EpisodeSelector {
            default_value: Some("Race".to_string()),
            ..Default::default()
        };
        let (result, _) = resolve(&season, &selector, &captures(&[], ""), None);
        assert_eq!(result.unwrap().episode.title, "Race");
    }

    #[test]
    fn test_same_named_episodes_use_date() {
        let season = season(
            "Double Header",
            vec![
                episode("Race", &[], Some((2026, 7, 4))),
                episode("Race", &[], Some((2026, 7, 11))),
            ],
        );
        let selector = EpisodeSelector::default();
        let (result, _) = resolve(
            &season,
            &selector,
            &captures(&[("session", "Race"), ("date", "2026-07-12")], ""),
            None,
        );
        assert_eq!(result.unwrap().episode.index, 2);

        // No date: ambiguous, and nothing else applies.
        let (result, _) = resolve(&season, &selector, &captures(&[("session", "Race")], ""), None);
        assert!(result.is_none());

        // Far from both: ambiguous, and the date fallback finds nothing either.
        let (result, _) = resolve(
            &season,
            &selector,
            &captures(&[("session", "Race"), ("date", "2026-08-01")], ""),
            None,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_ambiguous_lookup_skips_round_fallback() {
        let season = season(
            "Double Header",
            vec![
                episode("Race", &[], Some((2026, 7, 4))),
                episode("Race", &[], Some((2026, 7, 11))),
            ],
        );
        let (result, lookups) = resolve(
            &season,
            &EpisodeSelector::default(),
            &captures(
                &[("session", "Race"), ("date", "2026-08-01"), ("round", "1")],
                "",
            ),
            None,
        );
        assert!(result.is_none());
        assert!(!lookups.is_empty());
    }

    #[test]
    fn test_title_scan_fallback() {
        let season = monaco();
        let selector = EpisodeSelector {
            allow_fallback_to_title: true,
            ..Default::default()
        };
        let (result, _) = resolve(
            &season,
            &selector,
            &captures(&[("session", "Extended")], "Monaco.Qualifying.Extended"),
            None,
        );
        let result = result.unwrap();
        assert_eq!(result.episode.title, "Qualifying");
        assert_eq!(result.strategy, EpisodeStrategy::TitleScan);
    }

    #[test]
    fn test_round_location_fallback() {
        let season = season(
            "Rally Finland",
            vec![
                episode("Shakedown", &[], None),
                episode("Stage Jyvaskyla", &[], None),
                episode("Stage Ruuhimaki", &[], None),
            ],
        );
        let selector = EpisodeSelector::default();
        let (result, _) = resolve(
            &season,
            &selector,
            &captures(&[("round", "2"), ("location", "Jyvaskyla")], ""),
            None,
        );
        let result = result.unwrap();
        assert_eq!(result.episode.title, "Stage Jyvaskyla");
        assert_eq!(result.strategy, EpisodeStrategy::RoundLocation);

        let (result, _) = resolve(&season, &selector, &captures(&[("round", "3")], ""), None);
        assert_eq!(result.unwrap().episode.title, "Stage Ruuhimaki");
    }

    #[test]
    fn test_date_only_fallback() {
        let season = monaco();
        let (result, _) = resolve(
            &season,
            &EpisodeSelector::default(),
            &captures(&[("session", "Unknown Show"), ("day", "23"), ("month", "05")], ""),
            None,
        );
        let result = result.unwrap();
        // Year comes from the season title.
        assert_eq!(result.episode.title, "Qualifying");
        assert_eq!(result.strategy, EpisodeStrategy::DateProximity);
    }

    #[test]
    fn test_team_groups_canonicalized() {
        let season = season(
            "Week 16",
            vec![episode("Boston Celtics vs Miami Heat", &[], Some((2024, 12, 22)))],
        );
        let mut table = crate::config::TeamAliasTable::new();
        table.insert("Boston Celtics".to_string(), vec!["Celtics".to_string()]);
        table.insert("Miami Heat".to_string(), vec!["Heat".to_string()]);
        let resolver = TeamAliasResolver::from_table(&table);

        let (result, lookups) = resolve(
            &season,
            &EpisodeSelector::default(),
            &captures(&[("away", "Celtics"), ("home", "Heat.720p")], ""),
            Some(&resolver),
        );
        let result = result.unwrap();
        assert_eq!(result.episode.title, "Boston Celtics vs Miami Heat");
        assert_eq!(result.groups["session"], "Boston Celtics vs Miami Heat");
        assert_eq!(result.groups["home"], "Miami Heat");
        assert_eq!(lookups[0].label, "session");
    }
}
