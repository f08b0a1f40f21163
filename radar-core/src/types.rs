//! Core types for the technology radar.
//!
//! These types model a blip (one assessed technology), its classification
//! (ring, status, quadrant) and its dated history of ring assignments, plus
//! the derived shapes handed to the visualization and report renderers.
//!
//! With the `typescript` feature enabled, the output types can be exported to
//! TypeScript using ts-rs.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::config::RadarConfig;

/// Adoption-stage classification.
///
/// Ordered from most adopted to least: `Adopt < Trial < Assess < Hold`.
/// The ordering drives transition direction, so it is fixed by the
/// discriminants rather than by label comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Ring {
    /// Proven, recommended by default
    Adopt = 0,
    /// Worth pursuing on projects that can handle the risk
    Trial = 1,
    /// Worth exploring to understand the impact
    Assess = 2,
    /// Proceed with caution, do not start new work with it
    Hold = 3,
}

impl Ring {
    /// All rings, innermost first.
    pub const ALL: [Ring; 4] = [Ring::Adopt, Ring::Trial, Ring::Assess, Ring::Hold];

    /// Label as written in content files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adopt => "Adopt",
            Self::Trial => "Trial",
            Self::Assess => "Assess",
            Self::Hold => "Hold",
        }
    }

    /// Parse an exact label (`"Adopt"`, `"Trial"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ring| ring.as_str() == label)
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a blip's ring changed at its most recent review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Status {
    /// First appearance on the radar
    New,
    /// Moved toward Adopt
    #[serde(rename = "Moved In")]
    MovedIn,
    /// Moved away from Adopt
    #[serde(rename = "Moved Out")]
    MovedOut,
    /// Re-reviewed, ring unchanged
    #[serde(rename = "No Change")]
    NoChange,
}

impl Status {
    /// All statuses, in declaration order.
    pub const ALL: [Status; 4] = [
        Status::New,
        Status::MovedIn,
        Status::MovedOut,
        Status::NoChange,
    ];

    /// Label as written in content files (`"Moved In"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::MovedIn => "Moved In",
            Self::MovedOut => "Moved Out",
            Self::NoChange => "No Change",
        }
    }

    /// Parse an exact label; `"MovedIn"` and `"moved in"` are rejected.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External resource attached to a blip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Link {
    /// Display title (non-empty)
    pub title: String,
    /// Absolute URL, kept as authored
    pub url: String,
}

/// One dated ring assignment in a blip's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct HistoryEntry {
    /// Calendar date of the review
    pub date: NaiveDate,
    /// Ring assigned at that review
    pub ring: Ring,
    /// Justification (non-empty)
    pub note: String,
    /// Pull request reference in `#<digits>` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<String>,
}

/// A validated blip.
///
/// Built once per content source by the schema layer and never mutated
/// afterwards; authoring helpers return a new record instead.
///
/// Serializing a record yields its front matter only. `slug`, `content` and
/// `source` are derived at load time and are not written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlipRecord {
    pub name: String,
    pub quadrant: String,
    pub ring: Ring,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEntry>,

    /// URL-safe form of `name`
    #[serde(skip)]
    pub slug: String,
    /// Markdown body following the front matter
    #[serde(skip)]
    pub content: String,
    /// Where the record was loaded from, if anywhere
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl BlipRecord {
    /// The chronologically-last history entry by stored position.
    pub fn latest_history(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }
}

/// Visualization projection of a blip for the Zalando radar renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ZalandoEntry {
    pub label: String,
    /// Index into the configured quadrants (0..=3)
    pub quadrant: u8,
    /// 0 = Adopt (inner) to 3 = Hold (outer)
    pub ring: u8,
    /// -1 = moved out, 0 = no change, 1 = moved in, 2 = new
    pub moved: i8,
}

/// Payload consumed by the radar renderer (`data/entries.json`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ZalandoRadarData {
    pub entries: Vec<ZalandoEntry>,
    pub config: RadarConfig,
}

/// A history entry that falls inside a reporting window.
///
/// `from_ring` is absent exactly when the entry is the blip's first-ever
/// history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntry {
    pub blip_name: String,
    pub quadrant: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_ring: Option<Ring>,
    pub to_ring: Ring,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<String>,
    pub slug: String,
}

/// Direction of a changelog transition relative to Adopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    /// First-ever history record
    New,
    /// Moved toward Adopt
    MovedIn,
    /// Moved away from Adopt
    MovedOut,
    /// Recorded re-review with the same ring on both sides
    Unchanged,
}
