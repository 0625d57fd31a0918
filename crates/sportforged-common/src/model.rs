//! Show / Season / Episode metadata tree.
//!
//! A [`Show`] is loaded once per run by a metadata collaborator and handed to
//! the matcher as a read-only snapshot. Seasons usually map to a competition
//! round or week; episodes map to sessions (practice, qualifying, a matchup).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Free-form metadata bag attached to shows, seasons, and episodes.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A sport's metadata catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// One season of a show, typically a round, week, or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// 0-based position in the show. Assigned by [`Show::normalize_indexes`].
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub sort_title: Option<String>,
    #[serde(default)]
    pub display_number: Option<u32>,
    #[serde(default)]
    pub round_number: Option<u32>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// One session within a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub originally_available: Option<NaiveDate>,
    /// 1-based position in the season when not supplied by the provider.
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub display_number: Option<u32>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Show {
    /// Decode a show snapshot from JSON and normalize its indexes.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut show: Show = serde_json::from_str(json)?;
        if show.key.trim().is_empty() {
            return Err(Error::invalid_snapshot("show key must not be empty"));
        }
        show.normalize_indexes();
        Ok(show)
    }

    /// Read a show snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        Self::from_json(&contents)
    }

    /// Assign season positions and fill in missing episode positions.
    pub fn normalize_indexes(&mut self) {
        for (position, season) in self.seasons.iter_mut().enumerate() {
            season.index = position as u32;
            for (ep_position, episode) in season.episodes.iter_mut().enumerate() {
                if episode.index == 0 {
                    episode.index = ep_position as u32 + 1;
                }
            }
        }
    }

    /// Look up a season by its key.
    pub fn season_by_key(&self, key: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.key == key)
    }

    /// Iterate every (season, episode) pair in show order.
    pub fn episodes(&self) -> impl Iterator<Item = (&Season, &Episode)> {
        self.seasons
            .iter()
            .flat_map(|season| season.episodes.iter().map(move |ep| (season, ep)))
    }
}

impl Season {
    /// The number shown to users: display number, else round number, else 1-based position.
    pub fn number(&self) -> u32 {
        self.display_number
            .or(self.round_number)
            .unwrap_or(self.index + 1)
    }
}

impl Episode {
    /// The number shown to users: display number, else position.
    pub fn number(&self) -> u32 {
        self.display_number.unwrap_or(self.index)
    }

    /// Title followed by every alias, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "key": "f1-2026",
        "title": "Formula 1 2026",
        "seasons": [
            {
                "key": "r01",
                "title": "Australian Grand Prix",
                "round_number": 1,
                "episodes": [
                    {"title": "Qualifying", "originally_available": "2026-03-07"},
                    {"title": "Race", "originally_available": "2026-03-08", "aliases": ["Grand Prix"]}
                ]
            },
            {
                "key": "r02",
                "title": "Chinese Grand Prix",
                "round_number": 2,
                "episodes": [{"title": "Race", "index": 7}]
            }
        ]
    }"#;

    #[test]
    fn test_from_json_assigns_indexes() {
        let show = Show::from_json(SNAPSHOT).unwrap();
        assert_eq!(show.seasons[0].index, 0);
        assert_eq!(show.seasons[1].index, 1);
        assert_eq!(show.seasons[0].episodes[0].index, 1);
        assert_eq!(show.seasons[0].episodes[1].index, 2);
        // Provider-supplied positions are kept.
        assert_eq!(show.seasons[1].episodes[0].index, 7);
    }

    #[test]
    fn test_from_json_parses_dates() {
        let show = Show::from_json(SNAPSHOT).unwrap();
        assert_eq!(
            show.seasons[0].episodes[1].originally_available,
            NaiveDate::from_ymd_opt(2026, 3, 8)
        );
        assert_eq!(show.seasons[1].episodes[0].originally_available, None);
    }

    #[test]
    fn test_from_json_rejects_empty_key() {
        let err = Show::from_json(r#"{"key": " ", "title": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_season_number_fallbacks() {
        let show = Show::from_json(SNAPSHOT).unwrap();
        assert_eq!(show.seasons[1].number(), 2);

        let mut season = show.seasons[1].clone();
        season.round_number = None;
        assert_eq!(season.number(), 2);
        season.display_number = Some(9);
        assert_eq!(season.number(), 9);
    }

    #[test]
    fn test_episode_names_and_iteration() {
        let show = Show::from_json(SNAPSHOT).unwrap();
        let race = &show.seasons[0].episodes[1];
        assert_eq!(race.names().collect::<Vec<_>>(), vec!["Race", "Grand Prix"]);
        assert_eq!(show.episodes().count(), 3);
        assert_eq!(show.season_by_key("r02").map(|s| s.round_number), Some(Some(2)));
    }
}
