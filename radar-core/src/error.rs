//! Error types for radar content.
//!
//! Schema failures carry every violation found, never just the first, so
//! tools can report a whole record at once.

use std::fmt;

use serde::Serialize;

/// One structural problem found while validating a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted field path, e.g. `history.1.date`. Empty for the record itself.
    pub path: String,
    /// Human-readable reason
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

/// Hard validation failure from the schema layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} schema violation(s): {}", .violations.len(), join_violations(.violations))]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

impl SchemaError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn single(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![Violation::new(path, reason)])
    }

    /// Violations rendered as `path: reason` lines.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cross-reference failure between a record and the radar configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Quadrant name not among the configured quadrants
    #[error("Unknown quadrant: {0}")]
    UnknownQuadrant(String),
}

/// Malformed front-matter document.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// Opening `---` without a closing delimiter
    #[error("Front matter is not terminated by a closing '---' line")]
    Unterminated,

    /// Header is not valid YAML
    #[error("Invalid front matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure to turn a content document into a blip.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl LoadError {
    /// Individual messages, one per violation for schema failures.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::FrontMatter(e) => vec![e.to_string()],
            Self::Schema(e) => e.messages(),
        }
    }
}

/// Failure to load the radar configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration text is not valid YAML
    #[error("Invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
