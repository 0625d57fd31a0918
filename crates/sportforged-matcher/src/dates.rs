//! Date parsing for captured values.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use sportforged_common::text::parse_loose_int;

/// Full date formats, tried in order.
const FULL_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%Y %m %d", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y", "%d %m %Y",
];

/// Day-month formats, usable only with a reference year.
const PARTIAL_DATE_FORMATS: [&str; 5] = ["%d %m", "%d-%m", "%d.%m", "%d/%m", "%d_%m"];

/// Maximum distance, in days, for two dates to count as the same event.
pub const DATE_PROXIMITY_DAYS: i64 = 2;

static YEAR_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("year pattern is valid"));

/// Parse a captured date string.
///
/// Partial `DD MM` style values are accepted only when `reference_year` is given.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sportforged_matcher::dates::parse_date;
///
/// assert_eq!(parse_date("2024.12.22", None), NaiveDate::from_ymd_opt(2024, 12, 22));
/// assert_eq!(parse_date("22 12", Some(2024)), NaiveDate::from_ymd_opt(2024, 12, 22));
/// assert_eq!(parse_date("22 12", None), None);
/// ```
pub fn parse_date(value: &str, reference_year: Option<i32>) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for format in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    let year = reference_year?;
    for format in PARTIAL_DATE_FORMATS {
        let with_year = format!("{} {}", value, year);
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, &format!("{} %Y", format)) {
            return Some(date);
        }
    }
    None
}

/// Build a date from `date` or `day`/`month`/`year` capture groups.
///
/// Two-digit years are taken as 20xx; a missing year falls back to
/// `reference_year`.
pub fn date_from_groups(
    groups: &BTreeMap<String, String>,
    reference_year: Option<i32>,
) -> Option<NaiveDate> {
    if let Some(date) = groups.get("date").and_then(|v| parse_date(v, reference_year)) {
        return Some(date);
    }

    let day = groups.get("day").and_then(|v| parse_loose_int(v))?;
    let month = groups.get("month").and_then(|v| parse_loose_int(v))?;
    let year = match groups.get("year").and_then(|v| parse_loose_int(v)) {
        Some(y) if y < 100 => y + 2000,
        Some(y) => y,
        None => i64::from(reference_year?),
    };
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Year from the `year` group, else the first year mentioned in `context`.
pub fn reference_year(groups: &BTreeMap<String, String>, context: &str) -> Option<i32> {
    if let Some(year) = groups
        .get("year")
        .and_then(|v| parse_loose_int(v))
        .and_then(|y| i32::try_from(y).ok())
        .filter(|y| *y >= 1900)
    {
        return Some(year);
    }
    YEAR_IN_TEXT
        .captures(context)
        .and_then(|caps| caps[1].parse().ok())
}

/// Absolute distance between two dates in days.
pub fn days_apart(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}

/// Whether two dates fall within [`DATE_PROXIMITY_DAYS`] of each other.
pub fn within_proximity(a: NaiveDate, b: NaiveDate) -> bool {
    days_apart(a, b) <= DATE_PROXIMITY_DAYS
}
