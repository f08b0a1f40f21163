//! Advisory checks between a blip's history and its current state.
//!
//! Two independent checks, composable and never failing:
//!
//! - **Current ring**: the last stored history entry must carry the blip's
//!   current ring.
//! - **Chronology**: stored entries must be non-decreasing by date. The check
//!   walks stored order; it does not sort.
//!
//! Findings are warnings. They never block construction or downstream use of
//! a [`BlipRecord`]; callers decide whether to treat them as build-breaking.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{BlipRecord, HistoryEntry, Ring};

/// A soft data-quality finding on a blip's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryWarning {
    /// Latest history entry disagrees with the current ring
    RingMismatch { latest: Ring, current: Ring },
    /// `later` is stored after `earlier` but dated before it
    OutOfOrder {
        /// Position of the offending (later-stored) entry
        index: usize,
        earlier: NaiveDate,
        later: NaiveDate,
    },
}

impl fmt::Display for HistoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RingMismatch { latest, current } => write!(
                f,
                "Latest history entry shows ring \"{latest}\" but current ring is \"{current}\". \
                 Please add a history entry or update the ring."
            ),
            Self::OutOfOrder { earlier, later, .. } => write!(
                f,
                "History entries must be in chronological order: {later} comes before {earlier}"
            ),
        }
    }
}

/// Compare the last stored history entry with the current ring.
///
/// An empty history yields nothing: a blip may have no recorded history yet.
pub fn check_current_ring(current: Ring, history: &[HistoryEntry]) -> Option<HistoryWarning> {
    let latest = history.last()?;
    (latest.ring != current).then_some(HistoryWarning::RingMismatch {
        latest: latest.ring,
        current,
    })
}

/// One warning per adjacent stored pair whose later entry is dated strictly
/// earlier than the former.
pub fn check_chronology(history: &[HistoryEntry]) -> Vec<HistoryWarning> {
    history
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].date < pair[0].date)
        .map(|(i, pair)| HistoryWarning::OutOfOrder {
            index: i + 1,
            earlier: pair[0].date,
            later: pair[1].date,
        })
        .collect()
}

/// Run every history check on a blip.
pub fn check_history(blip: &BlipRecord) -> Vec<HistoryWarning> {
    let mut warnings = Vec::new();
    if blip.history.is_empty() {
        return warnings;
    }
    warnings.extend(check_current_ring(blip.ring, &blip.history));
    warnings.extend(check_chronology(&blip.history));

    if !warnings.is_empty() {
        tracing::debug!(blip = %blip.name, count = warnings.len(), "History consistency warnings");
    }
    warnings
}

/// [`check_history`] rendered as human-readable messages.
pub fn history_warnings(blip: &BlipRecord) -> Vec<String> {
    check_history(blip).iter().map(ToString::to_string).collect()
}
