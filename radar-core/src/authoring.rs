//! Read-modify-write helpers for authoring tools.
//!
//! Records are immutable; every helper here returns a new [`BlipRecord`] (or
//! history) and leaves persisting it to the caller.

use chrono::NaiveDate;

use crate::error::SchemaError;
use crate::ordinal::ring_index;
use crate::schema::is_pr_reference;
use crate::slug::{lookup_key, slugify};
use crate::types::{BlipRecord, HistoryEntry, Link, Ring, Status};

/// Status implied by moving from `current` to `new`.
pub fn detect_status(current: Ring, new: Ring) -> Status {
    match ring_index(new).cmp(&ring_index(current)) {
        std::cmp::Ordering::Equal => Status::NoChange,
        std::cmp::Ordering::Less => Status::MovedIn,
        std::cmp::Ordering::Greater => Status::MovedOut,
    }
}

/// Accept `#123` or `123` and return `#123`.
pub fn normalize_pr(input: &str) -> Result<String, SchemaError> {
    let input = input.trim();
    let pr = if input.starts_with('#') {
        input.to_string()
    } else {
        format!("#{input}")
    };
    if is_pr_reference(&pr) {
        Ok(pr)
    } else {
        Err(SchemaError::single("pr", "Must be in format #123 or 123"))
    }
}

/// `<repo_url>/pull/<digits>` for a `#<digits>` reference.
pub fn pull_request_url(repo_url: &str, pr: &str) -> String {
    format!("{}/pull/{}", repo_url.trim_end_matches('/'), pr.trim_start_matches('#'))
}

/// One review of a blip, applied as a single edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub ring: Ring,
    /// Reason for the change (non-empty)
    pub note: String,
    /// `#123` or `123`
    pub pr: Option<String>,
    pub reviewed_by: Option<String>,
    pub date: NaiveDate,
}

/// Apply a review: ring, status, `last_reviewed` and a new history entry
/// change together.
pub fn apply_review(blip: &BlipRecord, update: ReviewUpdate) -> Result<BlipRecord, SchemaError> {
    let note = update.note.trim();
    if note.is_empty() {
        return Err(SchemaError::single("note", "Reason is required"));
    }
    let pr = update.pr.as_deref().map(normalize_pr).transpose()?;
    let note = match update.reviewed_by.as_deref().map(str::trim) {
        Some(reviewer) if !reviewer.is_empty() => format!("{note} (reviewed by {reviewer})"),
        _ => note.to_string(),
    };

    let status = detect_status(blip.ring, update.ring);
    tracing::info!(
        blip = %blip.name,
        from = %blip.ring,
        to = %update.ring,
        status = %status,
        "Applying review"
    );

    let mut updated = blip.clone();
    updated.ring = update.ring;
    updated.status = status;
    updated.last_reviewed = Some(update.date);
    updated.history.push(HistoryEntry {
        date: update.date,
        ring: update.ring,
        note,
        pr,
    });
    Ok(updated)
}

/// Input for a brand-new blip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlip {
    pub name: String,
    pub quadrant: String,
    pub ring: Ring,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub owners: Vec<String>,
    pub links: Vec<Link>,
}

/// Create a blip first seen on `today` with its initial history entry and the
/// default body template.
pub fn new_blip(input: NewBlip, today: NaiveDate) -> Result<BlipRecord, SchemaError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(SchemaError::single("name", "Blip name is required"));
    }
    let summary = input.summary.filter(|summary| !summary.trim().is_empty());

    Ok(BlipRecord {
        slug: slugify(&name),
        content: body_template(&name),
        quadrant: input.quadrant,
        ring: input.ring,
        status: Status::New,
        summary,
        tags: input.tags,
        owners: input.owners,
        since: Some(today),
        last_reviewed: Some(today),
        links: input.links,
        history: vec![HistoryEntry {
            date: today,
            ring: input.ring,
            note: format!("Initial entry at {}", input.ring),
            pr: None,
        }],
        source: None,
        name,
    })
}

/// Default markdown body for a new blip.
pub fn body_template(name: &str) -> String {
    format!(
        "## Overview

Brief description of {name} and what problem it solves.

## Why This Matters

Explain the strategic importance and benefits.

## When to Use

Guidelines for when this technology is appropriate.

## When Not to Use

Scenarios where alternatives might be better.

## Trade-offs & Considerations

Key trade-offs, limitations, or challenges to be aware of.

## Getting Started

Links to documentation, tutorials, or internal resources.

## Related Technologies

Other entries in the radar that relate to this one.
"
    )
}

/// Result of merging imported history into a blip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMerge {
    pub history: Vec<HistoryEntry>,
    pub added: usize,
}

/// Merge imported entries: entries dated like an existing one are skipped,
/// the rest are appended and the whole history is stably sorted by date
/// ascending. Imported entries are not checked against each other.
pub fn merge_history(existing: &[HistoryEntry], incoming: Vec<HistoryEntry>) -> HistoryMerge {
    let mut history = existing.to_vec();
    let mut added = 0;
    for entry in incoming {
        if existing.iter().any(|known| known.date == entry.date) {
            tracing::debug!(date = %entry.date, "Skipping history entry with known date");
            continue;
        }
        history.push(entry);
        added += 1;
    }
    history.sort_by_key(|entry| entry.date);
    HistoryMerge { history, added }
}

/// Find a blip by name or slug, ignoring case and punctuation.
pub fn find_blip<'a>(blips: &'a [BlipRecord], name_or_slug: &str) -> Option<&'a BlipRecord> {
    let wanted = lookup_key(name_or_slug);
    blips.iter().find(|blip| lookup_key(&blip.name) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::check_history;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn entry(d: &str, ring: Ring) -> HistoryEntry {
        HistoryEntry {
            date: date(d),
            ring,
            note: "note".to_string(),
            pr: None,
        }
    }

    fn kubernetes() -> BlipRecord {
        new_blip(
            NewBlip {
                name: "Kubernetes".to_string(),
                quadrant: "Platforms".to_string(),
                ring: Ring::Assess,
                summary: Some("Container orchestration".to_string()),
                tags: vec!["containers".to_string()],
                owners: vec![],
                links: vec![],
            },
            date("2023-06-01"),
        )
        .unwrap()
    }

    #[test]
    fn test_detect_status() {
        assert_eq!(detect_status(Ring::Assess, Ring::Trial), Status::MovedIn);
        assert_eq!(detect_status(Ring::Trial, Ring::Hold), Status::MovedOut);
        assert_eq!(detect_status(Ring::Adopt, Ring::Adopt), Status::NoChange);
    }

    #[test]
    fn test_normalize_pr() {
        assert_eq!(normalize_pr("123").unwrap(), "#123");
        assert_eq!(normalize_pr("#456").unwrap(), "#456");
        assert_eq!(normalize_pr(" 7 ").unwrap(), "#7");
        assert!(normalize_pr("PR-1").is_err());
        assert!(normalize_pr("#").is_err());
    }

    #[test]
    fn test_pull_request_url() {
        assert_eq!(
            pull_request_url("https://github.com/example/radar/", "#42"),
            "https://github.com/example/radar/pull/42"
        );
    }

    #[test]
    fn test_new_blip() {
        let blip = kubernetes();

        assert_eq!(blip.status, Status::New);
        assert_eq!(blip.slug, "kubernetes");
        assert_eq!(blip.since, Some(date("2023-06-01")));
        assert_eq!(blip.last_reviewed, blip.since);
        assert_eq!(blip.history.len(), 1);
        assert_eq!(blip.history[0].note, "Initial entry at Assess");
        assert!(blip.content.contains("Brief description of Kubernetes"));
        assert!(check_history(&blip).is_empty());
    }

    #[test]
    fn test_new_blip_requires_name() {
        let err = new_blip(
            NewBlip {
                name: "  ".to_string(),
                quadrant: "Tools".to_string(),
                ring: Ring::Hold,
                summary: None,
                tags: vec![],
                owners: vec![],
                links: vec![],
            },
            date("2024-01-01"),
        )
        .unwrap_err();
        assert_eq!(err.messages(), vec!["name: Blip name is required"]);
    }

    #[test]
    fn test_apply_review_is_one_consistent_edit() {
        let original = kubernetes();
        let updated = apply_review(
            &original,
            ReviewUpdate {
                ring: Ring::Trial,
                note: "Pilot successful".to_string(),
                pr: Some("456".to_string()),
                reviewed_by: Some("@platform-lead".to_string()),
                date: date("2024-01-15"),
            },
        )
        .unwrap();

        assert_eq!(updated.ring, Ring::Trial);
        assert_eq!(updated.status, Status::MovedIn);
        assert_eq!(updated.last_reviewed, Some(date("2024-01-15")));
        assert_eq!(updated.history.len(), 2);

        let latest = updated.latest_history().unwrap();
        assert_eq!(latest.note, "Pilot successful (reviewed by @platform-lead)");
        assert_eq!(latest.pr.as_deref(), Some("#456"));
        assert!(check_history(&updated).is_empty());

        // The source record is untouched.
        assert_eq!(original.ring, Ring::Assess);
        assert_eq!(original.history.len(), 1);
    }

    #[test]
    fn test_apply_review_rejects_bad_input() {
        let blip = kubernetes();
        let review = ReviewUpdate {
            ring: Ring::Trial,
            note: " ".to_string(),
            pr: None,
            reviewed_by: None,
            date: date("2024-01-15"),
        };
        assert!(apply_review(&blip, review.clone()).is_err());

        let bad_pr = ReviewUpdate {
            note: "ok".to_string(),
            pr: Some("abc".to_string()),
            ..review
        };
        let err = apply_review(&blip, bad_pr).unwrap_err();
        assert_eq!(err.violations[0].path, "pr");
    }

    #[test]
    fn test_merge_history_skips_known_dates_and_sorts() {
        let existing = vec![entry("2023-06-01", Ring::Assess), entry("2024-01-15", Ring::Trial)];
        let incoming = vec![
            entry("2024-01-15", Ring::Hold),
            entry("2022-11-01", Ring::Hold),
            entry("2024-06-01", Ring::Adopt),
        ];

        let merged = merge_history(&existing, incoming);

        assert_eq!(merged.added, 2);
        let dates: Vec<String> = merged.history.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2022-11-01", "2023-06-01", "2024-01-15", "2024-06-01"]);
        assert_eq!(merged.history[0].ring, Ring::Hold);
        assert_eq!(merged.history[2].ring, Ring::Trial);
    }

    #[test]
    fn test_merge_history_keeps_imported_rows_sharing_a_date() {
        let existing = vec![entry("2023-06-01", Ring::Assess)];
        let incoming = vec![entry("2022-11-01", Ring::Hold), entry("2022-11-01", Ring::Trial)];

        let merged = merge_history(&existing, incoming);

        assert_eq!(merged.added, 2);
        let rings: Vec<Ring> = merged.history.iter().map(|e| e.ring).collect();
        assert_eq!(rings, vec![Ring::Hold, Ring::Trial, Ring::Assess]);
    }

    #[test]
    fn test_find_blip() {
        let mut tbd = kubernetes();
        tbd.name = "Trunk Based Development".to_string();
        let blips = vec![kubernetes(), tbd];

        assert_eq!(find_blip(&blips, "kubernetes").unwrap().name, "Kubernetes");
        assert_eq!(
            find_blip(&blips, "trunk-based-development").unwrap().name,
            "Trunk Based Development"
        );
        assert!(find_blip(&blips, "helm").is_none());
    }
}
