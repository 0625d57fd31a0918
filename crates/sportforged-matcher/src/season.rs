//! Season selection from captured groups.

use regex::Regex;
use sportforged_common::text::{normalize_token, parse_loose_int};
use sportforged_common::{Season, Show};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::{SeasonMode, SeasonSelector};
use crate::dates::{parse_date, reference_year};

static TEMPLATE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("template pattern is valid")
});

/// Interpolate `{group}` references from the captured groups.
///
/// Returns `None` when any referenced group is missing.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use sportforged_matcher::season::interpolate;
///
/// let mut groups = BTreeMap::new();
/// groups.insert("year".to_string(), "2026".to_string());
/// groups.insert("round".to_string(), "05".to_string());
/// assert_eq!(interpolate("{year}-{round}", &groups).as_deref(), Some("2026-05"));
/// assert_eq!(interpolate("{missing}", &groups), None);
/// ```
pub fn interpolate(template: &str, groups: &BTreeMap<String, String>) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in TEMPLATE_VAR.captures_iter(template) {
        let whole = caps.get(0)?;
        let value = groups.get(&caps[1])?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Some(out)
}

/// The raw value the selector should resolve, if any.
pub fn selector_value(selector: &SeasonSelector, groups: &BTreeMap<String, String>) -> Option<String> {
    let value = match &selector.value_template {
        Some(template) => interpolate(template, groups)?,
        None => groups.get(selector.group_name())?.clone(),
    };
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve the season a filename belongs to.
pub fn select_season<'a>(
    show: &'a Show,
    selector: &SeasonSelector,
    groups: &BTreeMap<String, String>,
) -> Option<&'a Season> {
    if selector.mode == SeasonMode::Unknown {
        tracing::warn!(show = %show.key, "Unknown season selector mode; season unresolved");
        return None;
    }
    let value = selector_value(selector, groups)?;

    let season = match selector.mode {
        SeasonMode::Sequential => numeric(&value, selector.offset).and_then(|n| {
            let n = u32::try_from(n).ok()?;
            show.seasons.iter().find(|s| s.index == n)
        }),
        SeasonMode::Round => numeric(&value, selector.offset).and_then(|n| by_round(show, n)),
        SeasonMode::Week => numeric(&value, selector.offset).and_then(|n| by_week(show, n)),
        SeasonMode::Key => by_key(show, selector, &value),
        SeasonMode::Title => by_title(show, selector, &value),
        SeasonMode::Date => {
            let date = parse_date(&value, reference_year(groups, &show.title))?;
            show.seasons.iter().find(|s| {
                s.episodes
                    .iter()
                    .any(|e| e.originally_available == Some(date))
            })
        }
        SeasonMode::Unknown => None,
    };

    tracing::trace!(
        mode = ?selector.mode,
        value = %value,
        season = season.map(|s| s.key.as_str()),
        "Season selection"
    );
    season
}

fn numeric(value: &str, offset: i64) -> Option<i64> {
    parse_loose_int(value).map(|n| n + offset)
}

/// Round number, then display number, then 1-based position.
fn by_round(show: &Show, n: i64) -> Option<&Season> {
    let n = u32::try_from(n).ok()?;
    show.seasons
        .iter()
        .find(|s| s.round_number == Some(n))
        .or_else(|| show.seasons.iter().find(|s| s.display_number == Some(n)))
        .or_else(|| by_position(show, n))
}

/// Display number, then a "Week N" title, then the round rules.
fn by_week(show: &Show, n: i64) -> Option<&Season> {
    let week = u32::try_from(n).ok()?;
    let title = normalize_token(&format!("Week {}", week));
    show.seasons
        .iter()
        .find(|s| s.display_number == Some(week))
        .or_else(|| {
            show.seasons
                .iter()
                .find(|s| normalize_token(&s.title) == title)
        })
        .or_else(|| by_round(show, n))
}

fn by_position(show: &Show, n: u32) -> Option<&Season> {
    let position = usize::try_from(n).ok()?.checked_sub(1)?;
    show.seasons.get(position)
}

fn by_key<'a>(show: &'a Show, selector: &SeasonSelector, value: &str) -> Option<&'a Season> {
    show.seasons.iter().find(|s| s.key == value).or_else(|| {
        let index = lookup_mapping(&selector.mapping, value)?;
        let index = u32::try_from(index).ok()?;
        show.seasons.iter().find(|s| s.index == index)
    })
}

fn by_title<'a>(show: &'a Show, selector: &SeasonSelector, value: &str) -> Option<&'a Season> {
    let normalized_value = normalize_token(value);
    let aliased = selector.aliases.get(value).or_else(|| {
        selector
            .aliases
            .iter()
            .find(|(k, _)| normalize_token(k) == normalized_value)
            .map(|(_, v)| v)
    });
    let target = aliased
        .map(|t| normalize_token(t))
        .unwrap_or_else(|| normalized_value.clone());
    if target.is_empty() {
        return None;
    }

    if let Some(season) = show
        .seasons
        .iter()
        .find(|s| normalize_token(&s.title) == target)
    {
        return Some(season);
    }

    if let Some(season) = show.seasons.iter().find(|s| {
        let title = normalize_token(&s.title);
        !title.is_empty() && (title.contains(&target) || target.contains(&title))
    }) {
        return Some(season);
    }

    let round = lookup_mapping(&selector.mapping, value)?;
    let round = u32::try_from(round).ok()?;
    show.seasons
        .iter()
        .find(|s| s.round_number == Some(round) || s.display_number == Some(round))
}

/// Exact key first, then a normalized key match.
fn lookup_mapping(mapping: &BTreeMap<String, i64>, value: &str) -> Option<i64> {
    if let Some(v) = mapping.get(value) {
        return Some(*v);
    }
    let normalized = normalize_token(value);
    mapping
        .iter()
        .find(|(k, _)| normalize_token(k) == normalized)
        .map(|(_, v)| *v)
}
