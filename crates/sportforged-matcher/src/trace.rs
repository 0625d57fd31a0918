//! Diagnostics and match traces.
//!
//! Per-file outcomes are data. [`Diagnostic`]s summarize why a file did not
//! match; a [`MatchTrace`] records every step for offline debugging.

use serde::Serialize;

/// How loudly a miss should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected misses (samples, sports that tolerate unmatched files).
    Ignored,
    Warning,
    /// Configuration problems surfaced while matching.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Ignored => write!(f, "ignored"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// One step of the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchAttempt {
    StructuredSkipped { reason: String },
    StructuredRejected { best_score: Option<f64> },
    StructuredMatched { season: String, episode: String, score: f64 },
    PatternNoMatch { pattern: String },
    SeasonUnresolved { pattern: String, value: Option<String> },
    EpisodeUnresolved { pattern: String, season: String },
    CrossSeasonMatched { pattern: String, season: String, episode: String },
    Matched { pattern: String, season: String, episode: String },
}

/// One lookup variant tried by the episode resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRecord {
    pub label: String,
    pub value: String,
    pub normalized: String,
    pub canonical: Option<String>,
}

/// The final decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub season: String,
    pub episode: String,
    pub method: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchTrace {
    pub filename: String,
    pub attempts: Vec<MatchAttempt>,
    pub lookups: Vec<LookupRecord>,
    pub result: Option<MatchOutcome>,
}

impl MatchTrace {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    pub fn matched(&self) -> bool {
        self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(Severity::Warning, "no season for round 40");
        assert_eq!(diag.to_string(), "[warning] no season for round 40");
    }

    #[test]
    fn test_trace_serializes_tagged_attempts() {
        let mut trace = MatchTrace::new("Race.mkv");
        trace.attempts.push(MatchAttempt::PatternNoMatch {
            pattern: "^F1".to_string(),
        });
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["attempts"][0]["kind"], "pattern_no_match");
        assert_eq!(json["attempts"][0]["pattern"], "^F1");
        assert!(json["result"].is_null());
        assert!(!trace.matched());
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Ignored < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(serde_json::to_value(Severity::Ignored).unwrap(), "ignored");
    }
}
