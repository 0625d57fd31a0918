//! Structured filename matching for team sports.
//!
//! Filenames such as `NBA.2024.12.22.Celtics.vs.Heat.720p.mkv` carry their
//! own identity: a date and two teams. This path scores every episode in the
//! show against those facts and runs before any configured pattern. A parse
//! that does not look like a matchup quietly yields nothing so that pattern
//! matching can take over.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use sportforged_common::paths::strip_video_extension;
use sportforged_common::text::{normalize_token, normalize_words};
use sportforged_common::{Episode, Season, Show};
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::dates::within_proximity;
use crate::similarity;
use crate::teams::{
    clean_team_words, is_team_noise, split_matchup, TeamAliasResolver, MATCHUP_SEPARATORS,
};

/// Minimum score for a structured match to be accepted.
pub const STRUCTURED_ACCEPT: f64 = 0.6;

static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^0-9])(?:((?:19|20)\d{2})[ ._-](\d{1,2})[ ._-](\d{1,2})|(\d{1,2})[ ._-](\d{1,2})[ ._-]((?:19|20)\d{2}))(?:$|[^0-9])",
    )
    .expect("full date pattern is valid")
});

static ROUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])(?:r|round|week|wk)[ ._-]?(\d{1,2})(?:$|[^a-z0-9])")
        .expect("round pattern is valid")
});

/// Facts parsed from a matchup-style filename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredFilename {
    pub year: Option<i32>,
    pub date: Option<NaiveDate>,
    /// Teams as written, after noise removal.
    pub raw_teams: Vec<String>,
    /// Teams after alias resolution (or cleaned spelling when unknown).
    pub teams: Vec<String>,
    pub round: Option<u32>,
}

/// Best-scoring episode for a structured filename.
#[derive(Debug, Clone)]
pub struct StructuredMatch<'a> {
    pub season: &'a Season,
    pub episode: &'a Episode,
    pub score: f64,
    pub parsed: StructuredFilename,
}

/// Parse year, date, round, and teams from a filename.
///
/// Returns `None` when there is no matchup or either side is empty or is
/// really the competition name.
pub fn parse_structured_filename(
    filename: &str,
    show: &Show,
    resolver: &TeamAliasResolver,
) -> Option<StructuredFilename> {
    let stem = strip_video_extension(filename.trim());
    let words: Vec<String> = normalize_words(&stem.replace('@', " at "))
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    let separator = words
        .iter()
        .position(|w| MATCHUP_SEPARATORS.contains(&w.as_str()))?;
    let (left, right) = (&words[..separator], &words[separator + 1..]);
    if left.is_empty() || right.is_empty() {
        return None;
    }

    let year_position = words.iter().position(|w| is_year(w));
    let mut year = year_position.and_then(|i| words[i].parse::<i32>().ok());

    let mut date = parse_full_date(stem);
    if let Some(d) = date {
        year = Some(d.year());
    } else if let Some(y) = year {
        date = trailing_day_month(&words, year_position, y);
    }

    let round = ROUND
        .captures(stem)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    let away = resolve_side(left, resolver, Side::Left);
    let home = resolve_side(right, resolver, Side::Right);
    let title = normalize_token(&show.title);
    for (raw, _) in [&away, &home] {
        let token = normalize_token(raw);
        if token.is_empty() || token == title {
            tracing::trace!(team = %raw, "Structured parse rejected");
            return None;
        }
    }

    Some(StructuredFilename {
        year,
        date,
        raw_teams: vec![away.0, home.0],
        teams: vec![away.1, home.1],
        round,
    })
}

fn is_year(word: &str) -> bool {
    word.len() == 4
        && word.chars().all(|c| c.is_ascii_digit())
        && matches!(word.parse::<i32>(), Ok(1900..=2099))
}

fn parse_full_date(stem: &str) -> Option<NaiveDate> {
    let caps = FULL_DATE.captures(stem)?;
    let (y, m, d) = match (caps.get(1), caps.get(4)) {
        (Some(y), _) => (y.as_str(), &caps[2], &caps[3]),
        (None, Some(d)) => (&caps[6], &caps[5], d.as_str()),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// The last "DD MM" word pair, validated against the year.
fn trailing_day_month(words: &[String], year_position: Option<usize>, year: i32) -> Option<NaiveDate> {
    let is_small = |w: &str| w.len() <= 2 && w.chars().all(|c| c.is_ascii_digit());
    (0..words.len().saturating_sub(1)).rev().find_map(|i| {
        if Some(i) == year_position || Some(i + 1) == year_position {
            return None;
        }
        if !is_small(&words[i]) || !is_small(&words[i + 1]) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, words[i + 1].parse().ok()?, words[i].parse().ok()?)
    })
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Find the team on one side of the separator.
///
/// The left side ends with the team, so ever-shorter suffixes are tried; the
/// right side starts with it, so ever-shorter prefixes. Without a known
/// alias the side is trimmed of dates and quality noise instead.
fn resolve_side(words: &[String], resolver: &TeamAliasResolver, side: Side) -> (String, String) {
    let spans: Vec<&[String]> = match side {
        Side::Left => (0..words.len()).map(|start| &words[start..]).collect(),
        Side::Right => (1..=words.len()).rev().map(|end| &words[..end]).collect(),
    };
    for span in spans {
        let candidate = span.join(" ");
        if let Some(canonical) = resolver.canonicalize(&candidate) {
            return (candidate, canonical);
        }
    }

    let trimmed: Vec<String> = match side {
        Side::Left => {
            // Everything after the last number (usually the date).
            let start = words
                .iter()
                .rposition(|w| w.chars().all(|c| c.is_ascii_digit()))
                .map_or(0, |i| i + 1);
            clean_team_words(&words[start..])
        }
        Side::Right => {
            let end = words
                .iter()
                .position(|w| is_team_noise(w))
                .unwrap_or(words.len());
            clean_team_words(&words[..end])
        }
    };
    let cleaned = trimmed.join(" ");
    (cleaned.clone(), cleaned)
}

/// Teams named by an episode, canonicalized through the resolver.
fn episode_teams(episode: &Episode, resolver: &TeamAliasResolver) -> Option<BTreeSet<String>> {
    let (left, right) = split_matchup(&episode.title)?;
    Some(
        [left, right]
            .iter()
            .map(|team| normalize_token(&resolver.canonical_or_clean(team)))
            .collect(),
    )
}

/// Score one episode against a structured parse.
///
/// A known date more than two days off scores 0. Teams must match exactly
/// for multi-team input; partial overlap scores 0 too.
pub fn score_structured_match(
    parsed: &StructuredFilename,
    season: &Season,
    episode: &Episode,
    resolver: &TeamAliasResolver,
) -> f64 {
    let mut score = 0.0;

    match (parsed.date, episode.originally_available) {
        (Some(date), Some(aired)) => {
            if !within_proximity(date, aired) {
                return 0.0;
            }
            score += 0.4;
        }
        (None, Some(aired)) if parsed.year == Some(aired.year()) => score += 0.1,
        _ => {}
    }

    let input: BTreeSet<String> = parsed.teams.iter().map(|t| normalize_token(t)).collect();
    match episode_teams(episode, resolver) {
        Some(expected) if !input.is_empty() => {
            if input == expected {
                score += 0.55;
            } else if input.len() > 1 {
                return 0.0;
            } else {
                let overlap = input.intersection(&expected).count();
                if overlap == 0 {
                    return 0.0;
                }
                score += 0.35 + 0.05 * overlap as f64;
            }
        }
        _ => {
            let joined = normalize_words(&parsed.teams.join(" "));
            if similarity::ratio(&joined, &normalize_words(&episode.title)) >= 0.7 {
                score += 0.3;
            }
        }
    }

    if let Some(round) = parsed.round {
        if season.round_number == Some(round) || season.display_number == Some(round) {
            score += 0.1;
        }
    }

    score
}

/// Best episode across the whole show; ties keep the earliest.
pub fn best_structured_match<'a>(
    parsed: &StructuredFilename,
    show: &'a Show,
    resolver: &TeamAliasResolver,
) -> Option<(&'a Season, &'a Episode, f64)> {
    let mut best: Option<(&Season, &Episode, f64)> = None;
    for (season, episode) in show.episodes() {
        let score = score_structured_match(parsed, season, episode, resolver);
        if score > 0.0 && best.map_or(true, |(_, _, s)| score > s) {
            best = Some((season, episode, score));
        }
    }
    best
}

/// Parse and score a filename, accepting the best candidate at or above
/// [`STRUCTURED_ACCEPT`].
pub fn match_structured<'a>(
    filename: &str,
    show: &'a Show,
    resolver: &TeamAliasResolver,
) -> Option<StructuredMatch<'a>> {
    let parsed = parse_structured_filename(filename, show, resolver)?;
    let (season, episode, score) = best_structured_match(&parsed, show, resolver)?;
    if score < STRUCTURED_ACCEPT {
        tracing::debug!(filename, score, "Structured candidate below threshold");
        return None;
    }
    Some(StructuredMatch {
        season,
        episode,
        score,
        parsed,
    })
}
