//! Errors raised while loading a metadata snapshot.
//!
//! Matching itself never fails; a snapshot that cannot be read or does not
//! describe a usable show is the only shared failure.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read show snapshot {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed show snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    /// Decoded, but not a usable show.
    #[error("invalid show snapshot: {0}")]
    InvalidSnapshot(String),
}

impl Error {
    pub fn read<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_snapshot<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSnapshot(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_keeps_path_and_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::read("/shows/f1.json", io_err);
        assert_eq!(
            err.to_string(),
            "cannot read show snapshot \"/shows/f1.json\": no such file"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_decode_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().starts_with("malformed show snapshot"));
    }

    #[test]
    fn test_invalid_snapshot_display() {
        let err = Error::invalid_snapshot("empty show key");
        assert_eq!(err.to_string(), "invalid show snapshot: empty show key");
    }
}
