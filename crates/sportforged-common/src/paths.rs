//! Path utilities for stripping container extensions.
//!
//! Filenames reach the matcher as bare names; release-group and structured
//! parsing both need the stem without its container suffix.

/// List of recognized video container extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv", "mpg", "mpeg",
];

/// Strip a trailing video container extension from a filename, if present.
///
/// Only known container extensions are removed so that dotted release names
/// such as `F1.2026.R05` keep their last component.
pub fn strip_video_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_video_extension() {
        assert_eq!(strip_video_extension("F1.2026.R05.Race.mkv"), "F1.2026.R05.Race");
        assert_eq!(strip_video_extension("Game.MP4"), "Game");
        assert_eq!(strip_video_extension("F1.2026.R05"), "F1.2026.R05");
        assert_eq!(strip_video_extension("noext"), "noext");
    }
}
