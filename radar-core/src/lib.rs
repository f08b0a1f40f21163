//! Content model and change tracking for a technology radar.
//!
//! A radar is a curated set of blips, each with a current classification
//! (ring, quadrant, status) and a dated history of ring assignments. This
//! crate validates raw content records, checks history against current
//! state, projects blips onto radar coordinates and extracts time-windowed
//! change reports.
//!
//! # Pipeline
//!
//! ```text
//!  raw mapping ──► schema ──► BlipRecord ──┬─► consistency ──► warnings
//!                                          ├─► projection  ──► ZalandoEntry[]
//!                                          └─► changelog   ──► ChangeLogEntry[]
//! ```
//!
//! Every stage is a pure, synchronous function. Configuration is passed in
//! explicitly; nothing is held globally.
//!
//! # Example
//!
//! ```ignore
//! use radar_core::{BlipRecord, RadarConfig, extract_recent_changes, radar_data};
//!
//! let config = RadarConfig::from_yaml(&config_text)?;
//! let blip = BlipRecord::from_document(&markdown, Some(path))?;
//!
//! let data = radar_data([&blip], &config)?;
//! let changes = extract_recent_changes([&blip], config.changelog_days);
//! ```

pub mod authoring;
pub mod changelog;
pub mod config;
pub mod consistency;
pub mod document;
pub mod error;
pub mod ordinal;
pub mod projection;
pub mod schema;
pub mod slug;
pub mod types;
pub mod validation;

// Re-export main types
pub use authoring::{apply_review, detect_status, find_blip, merge_history, new_blip, NewBlip, ReviewUpdate};
pub use changelog::{classify, extract_recent_changes, extract_recent_changes_at, ChangeReport};
pub use config::RadarConfig;
pub use consistency::{check_chronology, check_current_ring, check_history, HistoryWarning};
pub use document::{render_document, split_front_matter};
pub use error::{ConfigError, FrontMatterError, LoadError, MappingError, SchemaError, Violation};
pub use ordinal::{quadrant_index, ring_index, status_moved_flag};
pub use projection::{radar_data, to_zalando_entries};
pub use schema::{parse_blip, parse_history_entry};
pub use slug::slugify;
pub use types::*;
pub use validation::{validate_blip, validate_blip_value, validate_config_value, ValidationReport, ValidationSummary};
