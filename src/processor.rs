//! Batch matching of filenames against one compiled sport.

use rayon::prelude::*;
use serde::Serialize;
use sportforged_common::{Episode, Season, Show};
use sportforged_matcher::{Diagnostic, MatchOutcome, MatchTrace, SportMatcher};
use sportforged_quality::{
    compute_quality_score, evaluate_upgrade, extract_quality, QualityInfo, QualityProfile,
    QualityScore, UpgradeDecision, UpgradeRequest,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Everything learned about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub filename: String,
    pub outcome: Option<MatchOutcome>,
    /// Destination key the upgrade decision was made for.
    pub destination: Option<String>,
    pub groups: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<MatchTrace>,
    pub quality: QualityInfo,
    pub score: QualityScore,
    pub decision: Option<UpgradeDecision>,
}

impl FileReport {
    pub fn matched(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Stable destination key for an episode.
pub fn destination_key(show: &Show, season: &Season, episode: &Episode) -> String {
    format!("{}/{}/{}", show.key, season.key, episode.title)
}

/// Matches files for one sport; safe to share across worker threads.
pub struct Processor<'a> {
    matcher: &'a SportMatcher,
    show: &'a Show,
    profile: QualityProfile,
    scores: HashMap<String, i64>,
    trace: bool,
}

impl<'a> Processor<'a> {
    pub fn new(matcher: &'a SportMatcher, show: &'a Show, profile: QualityProfile) -> Self {
        Self {
            matcher,
            show,
            profile,
            scores: HashMap::new(),
            trace: false,
        }
    }

    /// Record a full match trace in every report.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Prior quality scores keyed by destination.
    pub fn with_scores(mut self, scores: HashMap<String, i64>) -> Self {
        self.scores = scores;
        self
    }

    /// Match a single file. Directories in the path are ignored.
    pub fn match_file(&self, path: &str) -> FileReport {
        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        let mut diagnostics = Vec::new();
        let mut trace = self.trace.then(|| MatchTrace::new(filename.clone()));
        let result = self.matcher.match_file(
            &filename,
            self.show,
            Some(&mut diagnostics),
            trace.as_mut(),
        );

        let Some(result) = result else {
            let quality = extract_quality(&filename, None);
            let score = compute_quality_score(&quality, &self.profile);
            return FileReport {
                filename,
                outcome: None,
                destination: None,
                groups: BTreeMap::new(),
                diagnostics,
                trace,
                quality,
                score,
                decision: None,
            };
        };

        let quality = extract_quality(&filename, Some(&result.groups));
        let score = compute_quality_score(&quality, &self.profile);
        let destination = destination_key(self.show, result.season, result.episode);

        let session_label = result
            .groups
            .get("session")
            .cloned()
            .unwrap_or_else(|| result.episode.title.clone());
        let known_aliases: Vec<String> =
            result.episode.names().map(str::to_string).collect();
        let request = UpgradeRequest {
            filename: &filename,
            destination: &destination,
            info: Some(quality.clone()),
            session_label: &session_label,
            known_aliases: &known_aliases,
            existing: self.scores.contains_key(&destination),
        };
        let decision = evaluate_upgrade(&request, &self.scores, Some(&self.profile));

        tracing::debug!(
            filename = %filename,
            season = %result.season.key,
            episode = %result.episode.title,
            method = %result.method.name(),
            score = score.total,
            "Matched file"
        );

        FileReport {
            filename,
            outcome: Some(MatchOutcome {
                season: result.season.key.clone(),
                episode: result.episode.title.clone(),
                method: result.method.name(),
                score: result.method.score(),
            }),
            destination: Some(destination),
            groups: result.groups,
            diagnostics,
            trace,
            quality,
            score,
            decision: Some(decision),
        }
    }

    /// Match many files in parallel; reports come back in input order.
    pub fn match_files<S: AsRef<str> + Sync>(&self, paths: &[S]) -> Vec<FileReport> {
        let reports: Vec<FileReport> = paths
            .par_iter()
            .map(|path| self.match_file(path.as_ref()))
            .collect();

        let matched = reports.iter().filter(|r| r.matched()).count();
        tracing::info!(
            sport = %self.matcher.sport().id,
            total = reports.len(),
            matched,
            "Processed files"
        );
        reports
    }
}
