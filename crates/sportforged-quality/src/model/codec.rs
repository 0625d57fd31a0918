//! Video codec enum.

use super::ParseError;

/// Video codec family, collapsing encoder names onto their standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VideoCodec {
    /// H.265/HEVC (x265)
    H265,
    /// H.264/AVC (x264)
    H264,
    /// XviD (MPEG-4 Part 2)
    Xvid,
    /// DivX (MPEG-4 Part 2)
    DivX,
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoCodec::H265 => write!(f, "H.265"),
            VideoCodec::H264 => write!(f, "H.264"),
            VideoCodec::Xvid => write!(f, "XviD"),
            VideoCodec::DivX => write!(f, "DivX"),
        }
    }
}

impl std::str::FromStr for VideoCodec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x265" | "h265" | "h.265" | "hevc" => Ok(VideoCodec::H265),
            "x264" | "h264" | "h.264" | "avc" => Ok(VideoCodec::H264),
            "xvid" => Ok(VideoCodec::Xvid),
            "divx" => Ok(VideoCodec::DivX),
            _ => Err(ParseError(format!("invalid video codec: {}", s))),
        }
    }
}
