//! Sportforged-Common: shared metadata model, text helpers, and errors.
//!
//! This crate provides the pieces every other sportforged crate agrees on:
//!
//! - **Metadata model**: the read-only [`Show`] / [`Season`] / [`Episode`] tree
//!   that filenames are resolved against
//! - **Text helpers**: token normalization used by lookups and team matching
//! - **Path helpers**: container extension stripping
//! - **Error handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use sportforged_common::text::normalize_token;
//! use sportforged_common::paths::strip_video_extension;
//!
//! assert_eq!(normalize_token("Free Practice 1"), "freepractice1");
//! assert_eq!(strip_video_extension("F1.Race.mkv"), "F1.Race");
//! ```

pub mod error;
pub mod model;
pub mod paths;
pub mod text;

pub use error::{Error, Result};
pub use model::{Episode, Metadata, Season, Show};
