//! Quality attributes extracted from one filename.

use super::{HdrFormat, Resolution, Source, VideoCodec};

/// Everything the extractor learned about a release's quality.
///
/// Pure extraction output; it has no tie to any file on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityInfo {
    pub resolution: Option<Resolution>,
    pub source: Option<Source>,
    /// Release group as written in the filename.
    pub release_group: Option<String>,
    pub is_proper: bool,
    /// Also set for RERIP releases.
    pub is_repack: bool,
    pub codec: Option<VideoCodec>,
    pub hdr_format: Option<HdrFormat>,
}

impl QualityInfo {
    /// Whether the release is flagged as a corrected re-release.
    pub fn is_revision(&self) -> bool {
        self.is_proper || self.is_repack
    }
}

impl std::fmt::Display for QualityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(resolution) = self.resolution {
            parts.push(resolution.to_string());
        }
        if let Some(source) = self.source {
            parts.push(source.to_string());
        }
        if let Some(codec) = self.codec {
            parts.push(codec.to_string());
        }
        if let Some(hdr) = self.hdr_format {
            parts.push(hdr.to_string());
        }
        if self.is_proper {
            parts.push("PROPER".to_string());
        }
        if self.is_repack {
            parts.push("REPACK".to_string());
        }
        if let Some(ref group) = self.release_group {
            parts.push(format!("-{}", group));
        }
        if parts.is_empty() {
            write!(f, "unknown")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}
