//! Markdown documents with a YAML front-matter header.
//!
//! ```text
//! ---
//! name: Kubernetes
//! ring: Trial
//! ...
//! ---
//!
//! ## Overview
//! ```

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::error::{FrontMatterError, LoadError};
use crate::schema::parse_blip;
use crate::types::BlipRecord;

const DELIMITER: &str = "---";

/// Split a document into its raw front-matter mapping and markdown body.
///
/// A document that does not open with a `---` line has no header: the
/// mapping is empty and the whole text is the body. An empty header also
/// yields an empty mapping.
pub fn split_front_matter(text: &str) -> Result<(Value, &str), FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = strip_delimiter_line(text) else {
        return Ok((Value::Object(Map::new()), text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let raw = if header.trim().is_empty() {
                Value::Object(Map::new())
            } else {
                serde_yaml::from_str(header)?
            };
            return Ok((raw, body));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unterminated)
}

/// Text after an opening delimiter line, if `text` starts with one.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    let (first_line, after) = match rest.find('\n') {
        Some(end) => (&rest[..end], &rest[end + 1..]),
        None => (rest, ""),
    };
    first_line.trim().is_empty().then_some(after)
}

impl BlipRecord {
    /// Load a blip from a front-matter document.
    ///
    /// Derived fields are filled here: `slug` from the name, `content` as the
    /// trimmed body, and `source` as given.
    pub fn from_document(text: &str, source: Option<PathBuf>) -> Result<Self, LoadError> {
        let (raw, body) = split_front_matter(text)?;
        let mut blip = parse_blip(&raw)?;
        blip.content = body.trim().to_string();
        blip.source = source;
        Ok(blip)
    }
}

/// Write a blip back as a front-matter document.
pub fn render_document(blip: &BlipRecord) -> Result<String, serde_yaml::Error> {
    let header = serde_yaml::to_string(blip)?;
    Ok(format!("{DELIMITER}\n{header}{DELIMITER}\n\n{}\n", blip.content.trim()))
}
