//! # sportforged-matcher
//!
//! Matches sports release filenames to seasons and episodes of a show.
//!
//! ## Overview
//!
//! - [`SportConfig`] and [`PatternLibrary`]: per-sport patterns and the
//!   shared fragments, pattern sets, and team alias tables they reference.
//! - [`compile_patterns`]: fragment expansion and priority ordering.
//! - [`select_season`]: turns captured groups into a season.
//! - [`resolve_episode`]: session lookup with fuzzy, date, title, and round
//!   fallbacks.
//! - [`match_structured`]: team/date matching for matchup-style names.
//! - [`SportMatcher`]: everything above behind one thread-safe handle.
//!
//! Misses are never errors. They come back as [`Diagnostic`]s, and a
//! [`MatchTrace`] records every step when requested.
//!
//! ```
//! use sportforged_common::Show;
//! use sportforged_matcher::{PatternDefinition, PatternLibrary, SportConfig, SportMatcher};
//!
//! let show = Show::from_json(r#"{
//!     "key": "f1", "title": "Formula 1",
//!     "seasons": [{"key": "r05", "title": "Monaco", "round_number": 5,
//!                  "episodes": [{"title": "Qualifying"}, {"title": "Race"}]}]
//! }"#).unwrap();
//!
//! let mut sport = SportConfig::new("f1");
//! sport.patterns.push(PatternDefinition::new(
//!     r"^F1<sep><year><sep><round><sep>(?P<session>[a-z]+)",
//! ));
//!
//! let matcher = SportMatcher::new(&sport, &PatternLibrary::default()).unwrap();
//! let result = matcher.match_file("F1.2026.R05.Race.1080p.mkv", &show, None, None).unwrap();
//! assert_eq!(result.episode.title, "Race");
//! ```

pub mod config;
pub mod dates;
pub mod engine;
pub mod episode;
pub mod error;
pub mod fragments;
pub mod lookup;
pub mod patterns;
pub mod season;
pub mod similarity;
pub mod structured;
pub mod teams;
pub mod trace;

pub use config::{
    EpisodeSelector, PatternDefinition, PatternLibrary, SeasonMode, SeasonSelector, SportConfig,
    TeamAliasTable,
};
pub use engine::{is_sample, match_file_to_episode, MatchMethod, MatchResult, SportMatcher};
pub use episode::{resolve_episode, EpisodeRequest, EpisodeResolution, EpisodeStrategy};
pub use error::{Error, Result};
pub use fragments::{expand_fragments, FragmentTable};
pub use lookup::{resolve_session_lookup, SessionLookupIndex};
pub use patterns::{compile_patterns, Captures, PatternRuntime};
pub use season::select_season;
pub use structured::{match_structured, StructuredFilename, StructuredMatch};
pub use teams::TeamAliasResolver;
pub use trace::{Diagnostic, LookupRecord, MatchAttempt, MatchOutcome, MatchTrace, Severity};
