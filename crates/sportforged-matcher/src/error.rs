//! Configuration errors raised while preparing a sport for matching.
//!
//! Per-file misses are never errors; they come back as diagnostics. Only
//! setup problems found before the first filename is processed land here.

/// Fatal setup error for a sport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pattern failed to compile after fragment expansion.
    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A `<name>` reference has no fragment definition.
    #[error("unknown regex fragment '<{name}>'")]
    UnknownFragment { name: String },

    /// Fragments reference each other in a loop.
    #[error("cyclic regex fragment reference: {chain}")]
    FragmentCycle { chain: String },

    /// A sport references a pattern set that does not exist.
    #[error("unknown pattern set '{name}'")]
    UnknownPatternSet { name: String },

    /// A sport references a team alias table that does not exist.
    #[error("unknown team alias table '{name}'")]
    UnknownTeamAliasTable { name: String },
}

impl Error {
    pub fn unknown_fragment<S: Into<String>>(name: S) -> Self {
        Self::UnknownFragment { name: name.into() }
    }

    pub fn unknown_pattern_set<S: Into<String>>(name: S) -> Self {
        Self::UnknownPatternSet { name: name.into() }
    }

    pub fn unknown_team_alias_table<S: Into<String>>(name: S) -> Self {
        Self::UnknownTeamAliasTable { name: name.into() }
    }
}

/// Result type alias using the matcher Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unknown_fragment("venue");
        assert_eq!(err.to_string(), "unknown regex fragment '<venue>'");

        let err = Error::FragmentCycle {
            chain: "a -> b -> a".to_string(),
        };
        assert_eq!(err.to_string(), "cyclic regex fragment reference: a -> b -> a");

        let err = Error::unknown_pattern_set("motorsport");
        assert_eq!(err.to_string(), "unknown pattern set 'motorsport'");
    }

    #[test]
    fn test_invalid_regex_has_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::InvalidRegex {
            pattern: "(".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
