//! Data model types for quality attributes parsed from release names.
//!
//! This module contains the resolution, source, codec, and HDR classes the
//! extractor recognizes, plus the [`QualityInfo`] bundle it produces.

mod codec;
mod hdr;
mod info;
mod quality;

pub use codec::VideoCodec;
pub use hdr::HdrFormat;
pub use info::QualityInfo;
pub use quality::{Resolution, Source};

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.0)
    }
}

impl std::error::Error for ParseError {}
