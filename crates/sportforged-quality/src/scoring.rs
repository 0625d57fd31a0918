//! Weighted quality scores and the upgrade decision.

use crate::model::QualityInfo;
use crate::profile::{QualityProfile, ScoringTable};

/// Total score with its itemized breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityScore {
    pub total: i64,
    pub resolution_points: i64,
    pub source_points: i64,
    pub release_group_points: i64,
    pub proper_bonus: i64,
    pub repack_bonus: i64,
    pub hdr_bonus: i64,
}

/// Outcome of [`compare_quality`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityComparison {
    pub should_upgrade: bool,
    pub reason: String,
    pub new_score: i64,
    pub prior_score: Option<i64>,
    pub cutoff_reached: bool,
}

/// Sum the table points and bonuses for the extracted attributes.
///
/// # Examples
///
/// ```
/// use sportforged_quality::{compute_quality_score, extract_quality, QualityProfile};
///
/// let info = extract_quality("Race.1080p.WEB-DL.MWR.mkv", None);
/// let score = compute_quality_score(&info, &QualityProfile::default());
/// assert_eq!(score.total, 440);
/// ```
pub fn compute_quality_score(info: &QualityInfo, profile: &QualityProfile) -> QualityScore {
    let table = &profile.scoring;

    let resolution_points = info
        .resolution
        .map(|r| ScoringTable::points(&table.resolutions, r.key()))
        .unwrap_or(0);
    let source_points = info
        .source
        .map(|s| ScoringTable::points(&table.sources, s.key()))
        .unwrap_or(0);
    let release_group_points = info
        .release_group
        .as_deref()
        .map(|g| ScoringTable::points(&table.release_groups, g))
        .unwrap_or(0);
    let proper_bonus = if info.is_proper { table.proper_bonus } else { 0 };
    let repack_bonus = if info.is_repack { table.repack_bonus } else { 0 };
    let hdr_bonus = if info.hdr_format.is_some() {
        table.hdr_bonus
    } else {
        0
    };

    QualityScore {
        total: resolution_points
            + source_points
            + release_group_points
            + proper_bonus
            + repack_bonus
            + hdr_bonus,
        resolution_points,
        source_points,
        release_group_points,
        proper_bonus,
        repack_bonus,
        hdr_bonus,
    }
}

/// Decide whether a new file should replace the one at its destination.
///
/// Rules, first hit wins:
/// 1. Below `min_score` is always rejected.
/// 2. No prior score means there is nothing to replace.
/// 3. PROPER/REPACK always replace, even past the cutoff.
/// 4. A prior at or above `cutoff` is kept.
/// 5. Otherwise the new file must score strictly higher.
pub fn compare_quality(
    info: &QualityInfo,
    prior_score: Option<i64>,
    profile: &QualityProfile,
) -> QualityComparison {
    let new_score = compute_quality_score(info, profile).total;
    let cutoff_reached = match (profile.cutoff, prior_score) {
        (Some(cutoff), Some(prior)) => prior >= cutoff,
        _ => false,
    };

    let decision = |should_upgrade: bool, reason: String| QualityComparison {
        should_upgrade,
        reason,
        new_score,
        prior_score,
        cutoff_reached,
    };

    if let Some(min_score) = profile.min_score {
        if new_score < min_score {
            return decision(
                false,
                format!("Score {} below minimum {}", new_score, min_score),
            );
        }
    }

    let Some(prior) = prior_score else {
        return decision(true, format!("No existing file (score {})", new_score));
    };

    if info.is_revision() {
        let marker = if info.is_proper { "PROPER" } else { "REPACK" };
        return decision(
            true,
            format!("{} release replaces existing ({} vs {})", marker, new_score, prior),
        );
    }

    if cutoff_reached {
        return decision(
            false,
            format!(
                "Cutoff reached: existing score {} >= cutoff {}",
                prior,
                profile.cutoff.unwrap_or(prior)
            ),
        );
    }

    if new_score > prior {
        decision(true, format!("Upgrade: {} > {}", new_score, prior))
    } else {
        decision(false, format!("Not an upgrade: {} <= {}", new_score, prior))
    }
}
