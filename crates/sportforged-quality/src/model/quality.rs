//! Resolution and source classes used for scoring.

use super::ParseError;

/// Video resolution class of the release.
///
/// Declared lowest first so that ordering follows frame height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// Also used for bare `SD` markers.
    #[cfg_attr(feature = "serde", serde(rename = "480p"))]
    _480p,
    #[cfg_attr(feature = "serde", serde(rename = "576p"))]
    _576p,
    #[cfg_attr(feature = "serde", serde(rename = "720p"))]
    _720p,
    /// Interlaced 1080i counts here too.
    #[cfg_attr(feature = "serde", serde(rename = "1080p"))]
    _1080p,
    #[cfg_attr(feature = "serde", serde(rename = "2160p"))]
    _2160p,
}

impl Resolution {
    /// All classes, highest first.
    pub const ALL: [Resolution; 5] = [
        Resolution::_2160p,
        Resolution::_1080p,
        Resolution::_720p,
        Resolution::_576p,
        Resolution::_480p,
    ];

    /// Lowercase key used in scoring tables.
    pub fn key(&self) -> &'static str {
        match self {
            Resolution::_480p => "480p",
            Resolution::_576p => "576p",
            Resolution::_720p => "720p",
            Resolution::_1080p => "1080p",
            Resolution::_2160p => "2160p",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Resolution {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "2160p" | "4k" | "uhd" => Ok(Resolution::_2160p),
            "1080p" | "1080i" => Ok(Resolution::_1080p),
            "720p" => Ok(Resolution::_720p),
            "576p" => Ok(Resolution::_576p),
            "480p" | "sd" => Ok(Resolution::_480p),
            _ => Err(ParseError(format!("invalid resolution: {}", s))),
        }
    }
}

/// Where the recording came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Source {
    /// Disc rips and remuxes. Rare for live sport.
    BluRay,
    /// Untouched stream from a broadcaster's platform (F1TV, ESPN+, DAZN).
    WebDl,
    /// Re-encoded capture of a platform stream.
    WebRip,
    /// Over-the-air or satellite capture.
    Hdtv,
    Sdtv,
    DvdRip,
}

impl Source {
    /// Lowercase key used in scoring tables.
    pub fn key(&self) -> &'static str {
        match self {
            Source::BluRay => "bluray",
            Source::WebDl => "webdl",
            Source::WebRip => "webrip",
            Source::Hdtv => "hdtv",
            Source::Sdtv => "sdtv",
            Source::DvdRip => "dvdrip",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::BluRay => write!(f, "BluRay"),
            Source::WebDl => write!(f, "WEB-DL"),
            Source::WebRip => write!(f, "WEBRip"),
            Source::Hdtv => write!(f, "HDTV"),
            Source::Sdtv => write!(f, "SDTV"),
            Source::DvdRip => write!(f, "DVDRip"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bluray" | "blu-ray" | "bdrip" | "brrip" | "remux" => Ok(Source::BluRay),
            "web-dl" | "webdl" | "web" => Ok(Source::WebDl),
            "webrip" | "web-rip" => Ok(Source::WebRip),
            "hdtv" | "pdtv" | "dsr" | "dtv" | "tvrip" => Ok(Source::Hdtv),
            "sdtv" => Ok(Source::Sdtv),
            "dvdrip" | "dvd-rip" | "dvd" => Ok(Source::DvdRip),
            _ => Err(ParseError(format!("invalid source: {}", s))),
        }
    }
}
