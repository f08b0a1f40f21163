//! Per-record validation reports for authoring and CI tools.

use serde::Serialize;
use serde_json::Value;

use crate::config::RadarConfig;
use crate::consistency::history_warnings;
use crate::ordinal::quadrant_index;
use crate::schema::parse_blip;
use crate::types::BlipRecord;

/// Outcome of validating one record.
///
/// Schema violations and unknown quadrants are errors; history consistency
/// findings are warnings and do not affect `valid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Checks on an already-typed blip: quadrant cross-reference (when a config
/// is given) and history consistency.
pub fn validate_blip(blip: &BlipRecord, config: Option<&RadarConfig>) -> ValidationReport {
    let mut errors = Vec::new();
    if let Some(config) = config {
        if let Err(e) = quadrant_index(&blip.quadrant, &config.quadrants) {
            errors.push(format!("quadrant: {e}"));
        }
    }
    ValidationReport::from_parts(errors, history_warnings(blip))
}

/// Validate a raw blip mapping end to end.
pub fn validate_blip_value(raw: &Value, config: Option<&RadarConfig>) -> ValidationReport {
    match parse_blip(raw) {
        Ok(blip) => validate_blip(&blip, config),
        Err(e) => ValidationReport::from_parts(e.messages(), Vec::new()),
    }
}

/// Validate a raw configuration mapping.
pub fn validate_config_value(raw: &Value) -> ValidationReport {
    match RadarConfig::from_value(raw) {
        Ok(_) => ValidationReport::from_parts(Vec::new(), Vec::new()),
        Err(e) => ValidationReport::from_parts(e.messages(), Vec::new()),
    }
}

/// Tally of record outcomes across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Valid with no warnings
    pub valid: usize,
    /// Valid but with consistency warnings
    pub warnings: usize,
    /// Hard failures
    pub errors: usize,
}

impl ValidationSummary {
    pub fn record(&mut self, report: &ValidationReport) {
        if !report.valid {
            self.errors += 1;
        } else if report.has_warnings() {
            self.warnings += 1;
        } else {
            self.valid += 1;
        }
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> RadarConfig {
        RadarConfig::from_value(&json!({
            "title": "Radar",
            "repo_url": "https://github.com/example/radar",
            "quadrants": ["Techniques", "Platforms", "Tools", "Languages & Frameworks"],
            "rings": ["Adopt", "Trial", "Assess", "Hold"],
            "colors": {}
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_blip() {
        let report = validate_blip_value(
            &json!({ "name": "Rust", "quadrant": "languages & frameworks", "ring": "Adopt", "status": "New" }),
            Some(&config()),
        );
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_schema_errors_are_errors() {
        let report = validate_blip_value(&json!({ "name": "Rust" }), None);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_unknown_quadrant_is_error_only_with_config() {
        let raw = json!({ "name": "Widget", "quadrant": "Gadgets", "ring": "Hold", "status": "New" });

        assert!(validate_blip_value(&raw, None).valid);

        let report = validate_blip_value(&raw, Some(&config()));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["quadrant: Unknown quadrant: Gadgets"]);
    }

    #[test]
    fn test_history_mismatch_is_warning() {
        let report = validate_blip_value(
            &json!({
                "name": "Jenkins",
                "quadrant": "Tools",
                "ring": "Hold",
                "status": "Moved Out",
                "history": [{ "date": "2024-01-01", "ring": "Trial", "note": "Still fine" }]
            }),
            Some(&config()),
        );
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Trial"));
        assert!(report.warnings[0].contains("Hold"));
    }

    #[test]
    fn test_validate_config_value() {
        assert!(validate_config_value(&serde_json::to_value(config()).unwrap()).valid);

        let report = validate_config_value(&json!({ "title": "Radar" }));
        assert!(!report.valid);
        assert!(report.errors.contains(&"repo_url: Required".to_string()));
        assert!(report.errors.contains(&"quadrants: Required".to_string()));
    }

    #[test]
    fn test_summary_tally() {
        let mut summary = ValidationSummary::default();
        summary.record(&ValidationReport::from_parts(vec![], vec![]));
        summary.record(&ValidationReport::from_parts(vec![], vec!["w".to_string()]));
        summary.record(&ValidationReport::from_parts(vec!["e".to_string()], vec!["w".to_string()]));
        summary.record_error();

        assert_eq!(
            summary,
            ValidationSummary {
                valid: 1,
                warnings: 1,
                errors: 2
            }
        );
        assert!(!summary.passed());
    }
}
