//! Time-windowed change extraction.
//!
//! Every history entry dated strictly after `now - window` becomes a
//! [`ChangeLogEntry`]. The previous stored entry supplies `from_ring`; the
//! first-ever entry has none and counts as new. The combined list is ordered
//! most recent first.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::ordinal::ring_index;
use crate::types::{BlipRecord, ChangeDirection, ChangeLogEntry};

/// Start of the reporting window: `now - window_days`.
///
/// Saturates at the earliest representable instant for absurd windows.
pub fn cutoff(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A history date as an instant (midnight UTC).
fn date_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::default()).and_utc()
}

/// Whether `date` falls inside the window ending at `now`.
///
/// Strict: a date exactly at the cutoff is outside.
pub fn within_window(date: NaiveDate, now: DateTime<Utc>, window_days: u32) -> bool {
    date_instant(date) > cutoff(now, window_days)
}

/// Extract changes in the trailing `window_days` relative to `now`.
///
/// Entries are emitted per blip in stored history order, then stably sorted
/// by date descending. Same-ring re-reviews are reported as stored.
pub fn extract_recent_changes_at<'a, I>(
    blips: I,
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<ChangeLogEntry>
where
    I: IntoIterator<Item = &'a BlipRecord>,
{
    let mut changes = Vec::new();

    for blip in blips {
        for (i, entry) in blip.history.iter().enumerate() {
            if !within_window(entry.date, now, window_days) {
                continue;
            }
            changes.push(ChangeLogEntry {
                blip_name: blip.name.clone(),
                quadrant: blip.quadrant.clone(),
                date: entry.date,
                from_ring: i.checked_sub(1).map(|prev| blip.history[prev].ring),
                to_ring: entry.ring,
                note: entry.note.clone(),
                pr: entry.pr.clone(),
                slug: blip.slug.clone(),
            });
        }
    }

    changes.sort_by(|a, b| b.date.cmp(&a.date));

    tracing::debug!(
        window_days,
        cutoff = %cutoff(now, window_days),
        changes = changes.len(),
        "Extracted recent changes"
    );
    changes
}

/// [`extract_recent_changes_at`] relative to the current time.
pub fn extract_recent_changes<'a, I>(blips: I, window_days: u32) -> Vec<ChangeLogEntry>
where
    I: IntoIterator<Item = &'a BlipRecord>,
{
    extract_recent_changes_at(blips, window_days, Utc::now())
}

/// Direction of one change relative to Adopt.
pub fn classify(change: &ChangeLogEntry) -> ChangeDirection {
    let Some(from) = change.from_ring else {
        return ChangeDirection::New;
    };
    let (from, to) = (ring_index(from), ring_index(change.to_ring));
    match to.cmp(&from) {
        std::cmp::Ordering::Less => ChangeDirection::MovedIn,
        std::cmp::Ordering::Greater => ChangeDirection::MovedOut,
        std::cmp::Ordering::Equal => ChangeDirection::Unchanged,
    }
}

/// A changelog partitioned by direction, each group in extractor order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub new_entries: Vec<ChangeLogEntry>,
    pub moved_in: Vec<ChangeLogEntry>,
    pub moved_out: Vec<ChangeLogEntry>,
    /// Same ring on both sides; kept apart from the moves
    pub re_reviewed: Vec<ChangeLogEntry>,
}

impl ChangeReport {
    pub fn from_changes(changes: &[ChangeLogEntry]) -> Self {
        let mut report = Self::default();
        for change in changes {
            let bucket = match classify(change) {
                ChangeDirection::New => &mut report.new_entries,
                ChangeDirection::MovedIn => &mut report.moved_in,
                ChangeDirection::MovedOut => &mut report.moved_out,
                ChangeDirection::Unchanged => &mut report.re_reviewed,
            };
            bucket.push(change.clone());
        }
        report
    }

    pub fn total(&self) -> usize {
        self.new_entries.len() + self.moved_in.len() + self.moved_out.len() + self.re_reviewed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
