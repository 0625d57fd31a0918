//! Prior-score lookup and the combined upgrade entry point.

use std::collections::{BTreeMap, HashMap};

use crate::extract::extract_quality;
use crate::legacy::should_replace_legacy;
use crate::model::QualityInfo;
use crate::profile::QualityProfile;
use crate::scoring::{compare_quality, QualityComparison};

/// Read-only view of previously persisted quality scores, keyed by destination.
pub trait QualityScoreStore {
    fn quality_score(&self, destination: &str) -> Option<i64>;
}

impl QualityScoreStore for HashMap<String, i64> {
    fn quality_score(&self, destination: &str) -> Option<i64> {
        self.get(destination).copied()
    }
}

impl QualityScoreStore for BTreeMap<String, i64> {
    fn quality_score(&self, destination: &str) -> Option<i64> {
        self.get(destination).copied()
    }
}

/// Everything needed to decide one replacement.
#[derive(Debug, Clone)]
pub struct UpgradeRequest<'a> {
    pub filename: &'a str,
    pub destination: &'a str,
    /// Extracted quality; computed from `filename` when absent.
    pub info: Option<QualityInfo>,
    /// Session label as written in the new filename.
    pub session_label: &'a str,
    /// Other names the matched episode is known by.
    pub known_aliases: &'a [String],
    /// Whether a file already exists at the destination.
    pub existing: bool,
}

/// Which rule made the call, and what it decided.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpgradeDecision {
    Scored(QualityComparison),
    Legacy { should_replace: bool, reason: String },
}

impl UpgradeDecision {
    pub fn should_replace(&self) -> bool {
        match self {
            UpgradeDecision::Scored(cmp) => cmp.should_upgrade,
            UpgradeDecision::Legacy { should_replace, .. } => *should_replace,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            UpgradeDecision::Scored(cmp) => &cmp.reason,
            UpgradeDecision::Legacy { reason, .. } => reason,
        }
    }
}

/// Decide whether a new file should replace its destination.
///
/// Uses [`compare_quality`] with the persisted prior score when the profile
/// is enabled, otherwise the legacy marker/specificity rule.
pub fn evaluate_upgrade<S: QualityScoreStore + ?Sized>(
    request: &UpgradeRequest<'_>,
    store: &S,
    profile: Option<&QualityProfile>,
) -> UpgradeDecision {
    match profile {
        Some(profile) if profile.enabled => {
            let info = request
                .info
                .clone()
                .unwrap_or_else(|| extract_quality(request.filename, None));
            let prior = store.quality_score(request.destination);
            let comparison = compare_quality(&info, prior, profile);
            tracing::debug!(
                destination = request.destination,
                new_score = comparison.new_score,
                prior_score = ?comparison.prior_score,
                upgrade = comparison.should_upgrade,
                "Scored upgrade decision"
            );
            UpgradeDecision::Scored(comparison)
        }
        _ => {
            if !request.existing {
                return UpgradeDecision::Legacy {
                    should_replace: true,
                    reason: "No existing file".to_string(),
                };
            }
            let (should_replace, reason) = should_replace_legacy(
                request.filename,
                request.session_label,
                request.known_aliases,
            );
            UpgradeDecision::Legacy {
                should_replace,
                reason,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(filename: &'a str, aliases: &'a [String]) -> UpgradeRequest<'a> {
        UpgradeRequest {
            filename,
            destination: "F1/Season 05/Race.mkv",
            info: None,
            session_label: "Race",
            known_aliases: aliases,
            existing: true,
        }
    }

    #[test]
    fn test_scored_path_uses_store() {
        let mut store = HashMap::new();
        store.insert("F1/Season 05/Race.mkv".to_string(), 290);
        let profile = QualityProfile::default();
        let decision = evaluate_upgrade(
            &request("Race.1080p.WEB-DL.mkv", &[]),
            &store,
            Some(&profile),
        );
        match decision {
            UpgradeDecision::Scored(cmp) => {
                assert!(cmp.should_upgrade);
                assert_eq!(cmp.prior_score, Some(290));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_disabled_profile_falls_back_to_legacy() {
        let store: HashMap<String, i64> = HashMap::new();
        let profile = QualityProfile {
            enabled: false,
            ..Default::default()
        };
        let decision = evaluate_upgrade(&request("Race.1080p.mkv", &[]), &store, Some(&profile));
        assert!(matches!(decision, UpgradeDecision::Legacy { .. }));
        assert!(!decision.should_replace());

        let decision = evaluate_upgrade(&request("Race.PROPER.mkv", &[]), &store, None);
        assert!(decision.should_replace());
    }

    #[test]
    fn test_legacy_without_existing_file() {
        let store: BTreeMap<String, i64> = BTreeMap::new();
        let mut req = request("Race.mkv", &[]);
        req.existing = false;
        let decision = evaluate_upgrade(&req, &store, None);
        assert!(decision.should_replace());
        assert_eq!(decision.reason(), "No existing file");
    }
}
