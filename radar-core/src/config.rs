//! Radar configuration.
//!
//! Loaded once per run (typically from `radar.config.yml`) and passed
//! explicitly to every function that needs it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::error::{ConfigError, SchemaError};
use crate::schema::{field_path, is_absolute_url, is_hex_color, Collector};

/// Default for both day-count windows.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

fn default_base_path() -> String {
    "/".to_string()
}

/// Process-wide, read-only radar configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RadarConfig {
    pub title: String,
    /// Repository hosting the radar content; pull request links hang off it
    pub repo_url: String,
    /// URL prefix the site is served under
    pub base_path: String,
    /// Quadrant labels in renderer order (0 = bottom-right, clockwise)
    pub quadrants: [String; 4],
    /// Ring display names, innermost first
    pub rings: [String; 4],
    /// `#rrggbb` color keyed by ring name
    pub colors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    /// Window for the "recently changed" markers
    pub show_recent_changes_days: u32,
    /// Window for the changelog report
    pub changelog_days: u32,
}

impl RadarConfig {
    /// Validate a raw configuration mapping.
    pub fn from_value(raw: &Value) -> Result<Self, SchemaError> {
        let mut c = Collector::new();
        let Some(obj) = c.object("", raw) else {
            return c.finish(None);
        };

        let title = c.required_string(obj, "", "title", Some("Radar title is required"));
        let repo_url = c.required_string(obj, "", "repo_url", None).filter(|url| {
            let ok = is_absolute_url(url);
            if !ok {
                c.push("repo_url", "Repository URL must be valid");
            }
            ok
        });
        let base_path = c
            .optional_string(obj, "", "base_path")
            .unwrap_or_else(default_base_path);
        let quadrants = c.fixed_strings::<4>(obj, "", "quadrants", "Must have exactly 4 quadrants");
        let rings = c.fixed_strings::<4>(obj, "", "rings", "Must have exactly 4 rings");
        let colors = colors(&mut c, obj.get("colors"));
        let description = c.optional_string(obj, "", "description");
        let org_name = c.optional_string(obj, "", "org_name");
        let show_recent_changes_days =
            c.positive_int(obj, "", "show_recent_changes_days", DEFAULT_WINDOW_DAYS);
        let changelog_days = c.positive_int(obj, "", "changelog_days", DEFAULT_WINDOW_DAYS);

        let config = match (title, repo_url, quadrants, rings, colors) {
            (Some(title), Some(repo_url), Some(quadrants), Some(rings), Some(colors)) => Some(Self {
                title,
                repo_url,
                base_path,
                quadrants,
                rings,
                colors,
                description,
                org_name,
                show_recent_changes_days,
                changelog_days,
            }),
            _ => None,
        };
        c.finish(config)
    }

    /// Parse YAML text and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let raw: Value = serde_yaml::from_str(yaml)?;
        Ok(Self::from_value(&raw)?)
    }
}

fn colors(c: &mut Collector, value: Option<&Value>) -> Option<BTreeMap<String, String>> {
    let value = match value {
        None | Some(Value::Null) => {
            c.push("colors", "Required");
            return None;
        }
        Some(value) => value,
    };
    let obj = c.object("colors", value)?;

    let mut colors = BTreeMap::new();
    let mut complete = true;
    for (ring, color) in obj {
        let path = field_path("colors", ring);
        match color {
            Value::String(hex) if is_hex_color(hex) => {
                colors.insert(ring.clone(), hex.clone());
            }
            Value::String(_) => {
                c.push(path, "Must be hex color");
                complete = false;
            }
            other => {
                c.push(
                    path,
                    format!("Expected string, received {}", crate::schema::type_name(other)),
                );
                complete = false;
            }
        }
    }
    complete.then_some(colors)
}
