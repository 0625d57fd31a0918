//! Quality attribute extraction.
//!
//! Scans a filename (and any captured regex groups) for resolution, source,
//! codec, HDR, release group, and PROPER/REPACK markers. Every table is
//! ordered and the first matching marker wins.

use regex::Regex;
use sportforged_common::paths::strip_video_extension;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::model::{HdrFormat, QualityInfo, Resolution, Source, VideoCodec};

/// Compile a case-insensitive marker bounded by non-alphanumerics or the string edges.
fn marker(pattern: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:^|[^a-z0-9])(?:{})(?:$|[^a-z0-9])", pattern))
        .expect("marker pattern is valid")
}

static RESOLUTION_MARKERS: LazyLock<Vec<(Regex, Resolution)>> = LazyLock::new(|| {
    vec![
        (marker("2160p|4k|uhd"), Resolution::_2160p),
        (marker("1080p|1080i"), Resolution::_1080p),
        (marker("720p"), Resolution::_720p),
        (marker("576p"), Resolution::_576p),
        (marker("480p|sd"), Resolution::_480p),
    ]
});

static SOURCE_MARKERS: LazyLock<Vec<(Regex, Source)>> = LazyLock::new(|| {
    vec![
        (marker(r"blu[ ._-]?ray|bdrip|brrip|remux"), Source::BluRay),
        (marker(r"web[ ._-]?dl"), Source::WebDl),
        (marker(r"web[ ._-]?rip"), Source::WebRip),
        (
            marker("amzn|amazon|nf|netflix|dsnp|hmax|atvp|pcok|peacock|hulu|itunes|f1tv|dazn"),
            Source::WebDl,
        ),
        (marker("web"), Source::WebDl),
        (marker("hdtv|pdtv|dsr|dtv|tvrip"), Source::Hdtv),
        (marker("sdtv"), Source::Sdtv),
        (marker(r"dvd[ ._-]?rip|dvd"), Source::DvdRip),
    ]
});

static CODEC_MARKERS: LazyLock<Vec<(Regex, VideoCodec)>> = LazyLock::new(|| {
    vec![
        (marker(r"x265|h[ .]?265|hevc"), VideoCodec::H265),
        (marker(r"x264|h[ .]?264|avc"), VideoCodec::H264),
        (marker("xvid"), VideoCodec::Xvid),
        (marker("divx"), VideoCodec::DivX),
    ]
});

static HDR_MARKERS: LazyLock<Vec<(Regex, HdrFormat)>> = LazyLock::new(|| {
    vec![
        (marker(r"dolby[ ._-]?vision|dovi|dv"), HdrFormat::DolbyVision),
        (marker(r"hdr10\+|hdr10plus"), HdrFormat::Hdr10Plus),
        (marker("hdr10"), HdrFormat::Hdr10),
        (marker("hdr"), HdrFormat::Hdr),
        (marker("hlg"), HdrFormat::Hlg),
    ]
});

static PROPER_MARKER: LazyLock<Regex> = LazyLock::new(|| marker("proper"));
static REPACK_MARKER: LazyLock<Regex> = LazyLock::new(|| marker("repack|rerip"));

/// Group keys whose values are checked before the filename itself.
const QUALITY_GROUP_KEYS: &[&str] = &["resolution", "quality", "source", "codec", "hdr"];

/// Group keys that carry a release group directly.
const RELEASE_GROUP_KEYS: &[&str] = &["release_group", "group"];

/// Release groups accepted wherever they appear in the name.
const KNOWN_RELEASE_GROUPS: &[&str] = &[
    "mwr",
    "smcgill1969",
    "egortech",
    "verum",
    "darksidemux",
    "f1carreras",
    "playweb",
    "ntb",
];

/// Trailing segments that look like a release group but are quality or audio tokens.
const RELEASE_GROUP_DENYLIST: &[&str] = &[
    "2160p", "1080p", "1080i", "720p", "576p", "480p", "4k", "uhd", "sd", "hd", "fhd",
    "bluray", "remux", "bdrip", "web", "webdl", "dl", "webrip", "rip", "hdtv", "pdtv", "sdtv",
    "dsr", "dtv", "tvrip", "dvdrip", "dvd", "x264", "x265", "h264", "h265", "264", "265",
    "hevc", "avc", "xvid", "divx", "aac", "aac2", "ac3", "eac3", "dd", "dd2", "dd5", "ddp",
    "ddp2", "ddp5", "dts", "truehd", "atmos", "flac", "mp3", "opus", "hdr", "hdr10", "sdr",
    "dv", "hlg", "10bit", "8bit", "25fps", "50fps", "60fps", "proper", "repack", "rerip",
    "internal", "multi", "eng", "english", "mkv", "mp4", "ts",
];

/// Extract quality attributes from a filename.
///
/// Values in `groups` (the regex captures of the matched pattern) take
/// precedence over markers found in the filename text.
///
/// # Examples
///
/// ```
/// use sportforged_quality::{extract_quality, Resolution, Source};
///
/// let info = extract_quality("F1.2026.R05.Monaco.GP.Race.1080p.WEB-DL.MWR.mkv", None);
/// assert_eq!(info.resolution, Some(Resolution::_1080p));
/// assert_eq!(info.source, Some(Source::WebDl));
/// assert_eq!(info.release_group.as_deref(), Some("MWR"));
/// ```
pub fn extract_quality(filename: &str, groups: Option<&BTreeMap<String, String>>) -> QualityInfo {
    let mut texts: Vec<&str> = Vec::new();
    if let Some(groups) = groups {
        for key in QUALITY_GROUP_KEYS {
            if let Some(value) = groups.get(*key) {
                texts.push(value.as_str());
            }
        }
    }
    texts.push(filename);

    let release_group = groups
        .and_then(|g| {
            RELEASE_GROUP_KEYS
                .iter()
                .filter_map(|key| g.get(*key))
                .find(|value| !is_false_positive_group(value))
                .cloned()
        })
        .or_else(|| extract_release_group(filename));

    QualityInfo {
        resolution: first_marker(&texts, &RESOLUTION_MARKERS),
        source: first_marker(&texts, &SOURCE_MARKERS),
        release_group,
        is_proper: PROPER_MARKER.is_match(filename),
        is_repack: REPACK_MARKER.is_match(filename),
        codec: first_marker(&texts, &CODEC_MARKERS),
        hdr_format: first_marker(&texts, &HDR_MARKERS),
    }
}

/// Walk the texts in precedence order, returning the first table hit.
fn first_marker<T: Copy>(texts: &[&str], table: &[(Regex, T)]) -> Option<T> {
    texts.iter().find_map(|text| {
        table
            .iter()
            .find(|(re, _)| re.is_match(text))
            .map(|(_, value)| *value)
    })
}

/// Take the last delimited segment before the extension as the release group.
///
/// Rejects known false positives, in which case a known group found anywhere
/// else in the name is used instead.
pub fn extract_release_group(filename: &str) -> Option<String> {
    let stem = strip_video_extension(filename.trim());
    let segments: Vec<&str> = stem
        .split(['.', '-', '_', ' ', '[', ']', '(', ')'])
        .filter(|s| !s.is_empty())
        .collect();
    let candidate = *segments.last()?;

    if is_known_group(candidate) {
        return Some(candidate.to_string());
    }

    if is_false_positive_group(candidate) {
        return segments
            .iter()
            .rev()
            .find(|segment| is_known_group(segment))
            .map(|segment| segment.to_string());
    }

    Some(candidate.to_string())
}

fn is_known_group(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    KNOWN_RELEASE_GROUPS.contains(&lower.as_str())
}

fn is_false_positive_group(segment: &str) -> bool {
    let lower = segment.trim().to_lowercase();
    if lower.len() < 2 || lower.len() > 32 {
        return true;
    }
    if !lower.chars().all(|c| c.is_ascii_alphanumeric()) {
        return true;
    }
    if lower.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    RELEASE_GROUP_DENYLIST.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_f1_web_release() {
        let info = extract_quality("F1.2026.R05.Monaco.GP.Race.1080p.WEB-DL.MWR.mkv", None);
        assert_eq!(info.resolution, Some(Resolution::_1080p));
        assert_eq!(info.source, Some(Source::WebDl));
        assert_eq!(info.release_group.as_deref(), Some("MWR"));
        assert!(!info.is_proper);
        assert!(!info.is_repack);
        assert_eq!(info.codec, None);
        assert_eq!(info.hdr_format, None);
    }

    #[test]
    fn test_resolution_prefers_highest_marker() {
        let info = extract_quality("Match.720p.UHD.Upscale", None);
        assert_eq!(info.resolution, Some(Resolution::_2160p));
        let info = extract_quality("Match.1080i.HDTV", None);
        assert_eq!(info.resolution, Some(Resolution::_1080p));
        let info = extract_quality("Match.SD.DSR", None);
        assert_eq!(info.resolution, Some(Resolution::_480p));
        assert_eq!(info.source, Some(Source::Hdtv));
    }

    #[test]
    fn test_sd_inside_word_is_not_a_marker() {
        let info = extract_quality("Match.SDTV.XviD", None);
        assert_eq!(info.resolution, None);
        assert_eq!(info.source, Some(Source::Sdtv));
        assert_eq!(info.codec, Some(VideoCodec::Xvid));
    }

    #[test]
    fn test_source_table_order() {
        let cases = [
            ("Race.2160p.BluRay.REMUX", Source::BluRay),
            ("Race.1080p.WEBRip.x264", Source::WebRip),
            ("Race.1080p.AMZN.WEB-DL", Source::WebDl),
            ("Race.1080p.DSNP.h264", Source::WebDl),
            ("Race.720p.WEB.h264-GRP", Source::WebDl),
            ("Race.720p.HDTV.x264", Source::Hdtv),
            ("Race.PDTV", Source::Hdtv),
            ("Race.DVDRip", Source::DvdRip),
        ];
        for (name, expected) in cases {
            assert_eq!(extract_quality(name, None).source, Some(expected), "{name}");
        }
    }

    #[test]
    fn test_codec_and_hdr() {
        let info = extract_quality("GP.2160p.WEB-DL.DV.HDR10.H.265-GRP", None);
        assert_eq!(info.codec, Some(VideoCodec::H265));
        assert_eq!(info.hdr_format, Some(HdrFormat::DolbyVision));

        let info = extract_quality("GP.2160p.HDR10+.HEVC-GRP", None);
        assert_eq!(info.hdr_format, Some(HdrFormat::Hdr10Plus));

        let info = extract_quality("GP.2160p.HLG.x265", None);
        assert_eq!(info.hdr_format, Some(HdrFormat::Hlg));

        let info = extract_quality("GP.1080p.HDR.AVC", None);
        assert_eq!(info.hdr_format, Some(HdrFormat::Hdr));
        assert_eq!(info.codec, Some(VideoCodec::H264));
    }

    #[test]
    fn test_proper_repack_flags() {
        let info = extract_quality("Race.PROPER.1080p.HDTV-GRP", None);
        assert!(info.is_proper);
        assert!(!info.is_repack);

        let info = extract_quality("Race.1080p.RERIP.HDTV-GRP", None);
        assert!(info.is_repack);

        // Substrings of longer words do not count.
        let info = extract_quality("Improper.Conduct.1080p", None);
        assert!(!info.is_proper);
    }

    #[test]
    fn test_release_group_rejects_false_positives() {
        assert_eq!(extract_release_group("NBA.2024.12.22.Celtics.vs.Heat.720p.mkv"), None);
        assert_eq!(extract_release_group("Race.1080p.x264.mkv"), None);
        assert_eq!(
            extract_release_group("Race.1080p.WEB.h264-PLAYWEB.mkv").as_deref(),
            Some("PLAYWEB")
        );
        assert_eq!(
            extract_release_group("Race.1080p.HDTV-LOL[eztv]").as_deref(),
            Some("eztv")
        );
    }

    #[test]
    fn test_release_group_known_group_elsewhere() {
        assert_eq!(
            extract_release_group("F1.MWR.Race.1080p.WEB-DL.mkv").as_deref(),
            Some("MWR")
        );
    }

    #[test]
    fn test_captured_groups_take_precedence() {
        let mut groups = BTreeMap::new();
        groups.insert("quality".to_string(), "720p".to_string());
        groups.insert("group".to_string(), "SMCGILL1969".to_string());
        let info = extract_quality("Race.1080p.HDTV-OTHER.mkv", Some(&groups));
        assert_eq!(info.resolution, Some(Resolution::_720p));
        assert_eq!(info.source, Some(Source::Hdtv));
        assert_eq!(info.release_group.as_deref(), Some("SMCGILL1969"));
    }
}
