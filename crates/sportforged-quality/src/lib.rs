//! Sportforged-Quality: quality extraction, scoring, and upgrade decisions.
//!
//! Release names carry resolution, source, codec, HDR, release group, and
//! PROPER/REPACK markers. This crate turns them into a [`QualityInfo`],
//! scores it against a [`QualityProfile`], and decides whether a new file
//! should replace the one already at its destination.
//!
//! # Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for the model, profile, and decision types
//!
//! # Examples
//!
//! ```
//! use sportforged_quality::{compare_quality, extract_quality, QualityProfile};
//!
//! let info = extract_quality("F1.2026.R05.Monaco.GP.Race.1080p.WEB-DL.MWR.mkv", None);
//! let result = compare_quality(&info, Some(290), &QualityProfile::default());
//! assert!(result.should_upgrade);
//! assert_eq!(result.new_score, 440);
//! ```

pub mod extract;
pub mod legacy;
pub mod model;
pub mod profile;
pub mod scoring;
pub mod store;

pub use extract::{extract_quality, extract_release_group};
pub use legacy::{session_specificity, should_replace_legacy};
pub use model::{HdrFormat, ParseError, QualityInfo, Resolution, Source, VideoCodec};
pub use profile::{
    resolve_profile, QualityProfile, QualityProfileOverride, ScoringOverride, ScoringTable,
};
pub use scoring::{compare_quality, compute_quality_score, QualityComparison, QualityScore};
pub use store::{evaluate_upgrade, QualityScoreStore, UpgradeDecision, UpgradeRequest};
