//! Picking one record out of a search result list

use crate::lyrics::error::{LyricsError, NotFoundReason, Result};
use crate::lyrics::models::CandidateRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectOptions {
    /// Track length to match against, in seconds
    pub target_duration: Option<f64>,
    /// Only consider records with synced lyrics
    pub synced_only: bool,
}

/// Reject non-finite durations before any searching happens.
pub fn validate_duration(duration: Option<f64>) -> Result<()> {
    match duration {
        Some(d) if !d.is_finite() => Err(LyricsError::InvalidArgument(format!(
            "duration must be a finite number of seconds, got {d}"
        ))),
        _ => Ok(()),
    }
}

/// Keep only records that have synced lyrics when `synced_only` is set.
pub fn filter_synced(candidates: Vec<CandidateRecord>, synced_only: bool) -> Vec<CandidateRecord> {
    if !synced_only {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(CandidateRecord::has_synced_lyrics)
        .collect()
}

/// Select the best candidate.
///
/// With a target duration the record closest to it wins, the first one on
/// ties. Without one the provider's first record is returned.
pub fn select(candidates: Vec<CandidateRecord>, options: SelectOptions) -> Result<CandidateRecord> {
    validate_duration(options.target_duration)?;

    let had_any = !candidates.is_empty();
    let mut eligible = filter_synced(candidates, options.synced_only);
    if eligible.is_empty() {
        let reason = if had_any {
            NotFoundReason::NoneSynced
        } else {
            NotFoundReason::NoCandidates
        };
        return Err(LyricsError::not_found(reason));
    }

    let Some(target) = options.target_duration else {
        return Ok(eligible.swap_remove(0));
    };

    let mut best = 0;
    let mut best_diff = f64::INFINITY;
    for (i, rec) in eligible.iter().enumerate() {
        let diff = (rec.duration - target).abs();
        // strict `<` keeps the earliest record on ties
        if diff < best_diff {
            best = i;
            best_diff = diff;
        }
    }

    tracing::debug!(id = eligible[best].id, diff = best_diff, "closest duration match");
    Ok(eligible.swap_remove(best))
}
