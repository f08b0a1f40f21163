//! Structural validation of raw records.
//!
//! Callers hand in an untyped mapping (`serde_json::Value`, usually parsed
//! from a YAML front-matter header) and get back a typed record or a
//! [`SchemaError`] listing every violation with its field path.
//!
//! Validation has no side effects. Defaults: `tags`, `owners`, `links` and
//! `history` are empty when absent. Optional fields given as YAML `null`
//! (an empty `summary:` line) are treated as absent.

use std::fmt::Display;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{SchemaError, Violation};
use crate::slug::slugify;
use crate::types::{BlipRecord, HistoryEntry, Link, Ring, Status};

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"))
}

fn pr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9]+$").expect("valid PR pattern"))
}

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color pattern"))
}

/// Whether `pr` is a pull request reference of the form `#<digits>`.
pub fn is_pr_reference(pr: &str) -> bool {
    pr_pattern().is_match(pr)
}

/// Whether `color` is a `#rrggbb` hex color.
pub fn is_hex_color(color: &str) -> bool {
    hex_color_pattern().is_match(color)
}

/// Whether `url` parses as an absolute URL.
pub fn is_absolute_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

/// JSON type name used in type-mismatch messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn field_path(prefix: &str, key: impl Display) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Accumulates violations while a record is walked field by field.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    violations: Vec<Violation>,
}

impl Collector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(Violation::new(path, reason));
    }

    /// Finish validation: the built value if nothing was reported.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, SchemaError> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ if self.violations.is_empty() => Err(SchemaError::single("", "Invalid record")),
            _ => Err(SchemaError::new(self.violations)),
        }
    }

    pub(crate) fn object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.push(path, format!("Expected object, received {}", type_name(other)));
                None
            }
        }
    }

    /// Present, non-null field value.
    fn present<'v>(obj: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
        obj.get(key).filter(|value| !value.is_null())
    }

    fn string_at(&mut self, path: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.push(path, format!("Expected string, received {}", type_name(other)));
                None
            }
        }
    }

    /// Required string; `empty_reason` rejects the empty string.
    pub(crate) fn required_string(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        empty_reason: Option<&str>,
    ) -> Option<String> {
        let path = field_path(prefix, key);
        let Some(value) = Self::present(obj, key) else {
            self.push(path, "Required");
            return None;
        };
        let s = self.string_at(&path, value)?;
        if s.is_empty() {
            if let Some(reason) = empty_reason {
                self.push(path, reason);
                return None;
            }
        }
        Some(s)
    }

    pub(crate) fn optional_string(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Option<String> {
        let value = Self::present(obj, key)?;
        self.string_at(&field_path(prefix, key), value)
    }

    /// Array field, `None` when absent (callers apply the default).
    pub(crate) fn array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Option<&'v Vec<Value>> {
        match Self::present(obj, key)? {
            Value::Array(items) => Some(items),
            other => {
                self.push(
                    field_path(prefix, key),
                    format!("Expected array, received {}", type_name(other)),
                );
                None
            }
        }
    }

    pub(crate) fn string_list(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Vec<String> {
        let Some(items) = self.array(obj, prefix, key) else {
            return Vec::new();
        };
        let path = field_path(prefix, key);
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.string_at(&field_path(&path, i), item))
            .collect()
    }

    /// Exactly `N` strings.
    pub(crate) fn fixed_strings<const N: usize>(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        length_reason: &str,
    ) -> Option<[String; N]> {
        let path = field_path(prefix, key);
        if Self::present(obj, key).is_none() {
            self.push(path, "Required");
            return None;
        }
        let items = self.array(obj, prefix, key)?;
        let strings: Vec<String> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.string_at(&field_path(&path, i), item))
            .collect();
        if items.len() != N {
            self.push(path, length_reason);
            return None;
        }
        strings.try_into().ok()
    }

    fn date_at(&mut self, path: &str, value: &Value, format_reason: &str) -> Option<NaiveDate> {
        let s = self.string_at(path, value)?;
        if !date_pattern().is_match(&s) {
            self.push(path, format_reason);
            return None;
        }
        match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(path, format!("Invalid calendar date: {s}"));
                None
            }
        }
    }

    pub(crate) fn required_date(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        format_reason: &str,
    ) -> Option<NaiveDate> {
        let path = field_path(prefix, key);
        let Some(value) = Self::present(obj, key) else {
            self.push(path, "Required");
            return None;
        };
        self.date_at(&path, value, format_reason)
    }

    pub(crate) fn optional_date(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        format_reason: &str,
    ) -> Option<NaiveDate> {
        let value = Self::present(obj, key)?;
        self.date_at(&field_path(prefix, key), value, format_reason)
    }

    /// Required member of a closed label set.
    fn label<T>(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        all: &[T],
        as_str: impl Fn(&T) -> &'static str,
        from_label: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let path = field_path(prefix, key);
        let Some(value) = Self::present(obj, key) else {
            self.push(path, "Required");
            return None;
        };
        let s = self.string_at(&path, value)?;
        if let Some(found) = from_label(&s) {
            return Some(found);
        }
        let expected = all
            .iter()
            .map(|candidate| format!("'{}'", as_str(candidate)))
            .collect::<Vec<_>>()
            .join(" | ");
        self.push(
            path,
            format!("Invalid enum value. Expected {expected}, received '{s}'"),
        );
        None
    }

    pub(crate) fn ring(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<Ring> {
        self.label(obj, prefix, key, &Ring::ALL, Ring::as_str, Ring::from_label)
    }

    pub(crate) fn status(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<Status> {
        self.label(obj, prefix, key, &Status::ALL, Status::as_str, Status::from_label)
    }

    /// Positive integer with a default when absent.
    pub(crate) fn positive_int(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        default: u32,
    ) -> u32 {
        let path = field_path(prefix, key);
        let Some(value) = Self::present(obj, key) else {
            return default;
        };
        let Value::Number(number) = value else {
            self.push(path, format!("Expected number, received {}", type_name(value)));
            return default;
        };
        if let Some(n) = number.as_u64() {
            if n == 0 {
                self.push(path, "Number must be greater than 0");
                return default;
            }
            return match u32::try_from(n) {
                Ok(n) => n,
                Err(_) => {
                    self.push(path, format!("Number must be less than or equal to {}", u32::MAX));
                    default
                }
            };
        }
        match number.as_f64() {
            Some(f) if f.fract() != 0.0 => self.push(path, "Expected integer, received float"),
            _ => self.push(path, "Number must be greater than 0"),
        }
        default
    }
}

fn link_at(c: &mut Collector, path: &str, value: &Value) -> Option<Link> {
    let obj = c.object(path, value)?;
    let title = c.required_string(obj, path, "title", Some("Link title is required"));
    let url = c.required_string(obj, path, "url", None);
    let url = url.filter(|url| {
        let ok = is_absolute_url(url);
        if !ok {
            c.push(field_path(path, "url"), "Must be a valid URL");
        }
        ok
    });
    Some(Link { title: title?, url: url? })
}

fn history_entry_at(c: &mut Collector, path: &str, value: &Value) -> Option<HistoryEntry> {
    let obj = c.object(path, value)?;
    let date = c.required_date(obj, path, "date", "Date must be in YYYY-MM-DD format");
    let ring = c.ring(obj, path, "ring");
    let note = c.required_string(obj, path, "note", Some("History note is required"));
    let pr = c.optional_string(obj, path, "pr");
    let pr = match pr {
        Some(pr) if !is_pr_reference(&pr) => {
            c.push(field_path(path, "pr"), "PR must be in format #123");
            return None;
        }
        pr => pr,
    };
    Some(HistoryEntry {
        date: date?,
        ring: ring?,
        note: note?,
        pr,
    })
}

fn list_of<T>(
    c: &mut Collector,
    obj: &Map<String, Value>,
    key: &str,
    parse: impl Fn(&mut Collector, &str, &Value) -> Option<T>,
) -> Option<Vec<T>> {
    let Some(items) = c.array(obj, "", key) else {
        return Some(Vec::new());
    };
    let mut parsed = Vec::with_capacity(items.len());
    let mut complete = true;
    for (i, item) in items.iter().enumerate() {
        match parse(c, &field_path(key, i), item) {
            Some(value) => parsed.push(value),
            None => complete = false,
        }
    }
    complete.then_some(parsed)
}

/// Validate one link mapping.
pub fn parse_link(raw: &Value) -> Result<Link, SchemaError> {
    let mut c = Collector::new();
    let link = link_at(&mut c, "", raw);
    c.finish(link)
}

/// Validate one history entry mapping.
pub fn parse_history_entry(raw: &Value) -> Result<HistoryEntry, SchemaError> {
    let mut c = Collector::new();
    let entry = history_entry_at(&mut c, "", raw);
    c.finish(entry)
}

/// Validate a blip front-matter mapping into a [`BlipRecord`].
///
/// The slug is derived from the name; `content` is empty and `source` unset
/// (see [`crate::document`] for loading full documents).
pub fn parse_blip(raw: &Value) -> Result<BlipRecord, SchemaError> {
    let mut c = Collector::new();
    let Some(obj) = c.object("", raw) else {
        return c.finish(None);
    };

    let name = c.required_string(obj, "", "name", Some("Blip name is required"));
    let quadrant = c.required_string(obj, "", "quadrant", Some("Quadrant is required"));
    let ring = c.ring(obj, "", "ring");
    let status = c.status(obj, "", "status");
    let summary = c.optional_string(obj, "", "summary");
    let tags = c.string_list(obj, "", "tags");
    let owners = c.string_list(obj, "", "owners");
    let since = c.optional_date(obj, "", "since", "Since date must be in YYYY-MM-DD format");
    let last_reviewed = c.optional_date(
        obj,
        "",
        "last_reviewed",
        "Last reviewed date must be in YYYY-MM-DD format",
    );
    let links = list_of(&mut c, obj, "links", link_at);
    let history = list_of(&mut c, obj, "history", history_entry_at);

    let record = match (name, quadrant, ring, status, links, history) {
        (Some(name), Some(quadrant), Some(ring), Some(status), Some(links), Some(history)) => {
            Some(BlipRecord {
                slug: slugify(&name),
                name,
                quadrant,
                ring,
                status,
                summary,
                tags,
                owners,
                since,
                last_reviewed,
                links,
                history,
                content: String::new(),
                source: None,
            })
        }
        _ => None,
    };
    c.finish(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_blip() -> Value {
        json!({
            "name": "Kubernetes",
            "quadrant": "Platforms",
            "ring": "Trial",
            "status": "Moved In",
            "summary": "Container orchestration",
            "tags": ["containers", "orchestration"],
            "owners": ["@platform-team"],
            "since": "2023-06-01",
            "last_reviewed": "2024-01-15",
            "links": [{ "title": "Docs", "url": "https://kubernetes.io/docs/" }],
            "history": [
                { "date": "2023-06-01", "ring": "Assess", "note": "Initial evaluation", "pr": "#123" },
                { "date": "2024-01-15", "ring": "Trial", "note": "Pilot successful" }
            ]
        })
    }

    fn paths(err: &SchemaError) -> Vec<&str> {
        err.violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_parse_valid_blip() {
        let blip = parse_blip(&valid_blip()).unwrap();

        assert_eq!(blip.name, "Kubernetes");
        assert_eq!(blip.slug, "kubernetes");
        assert_eq!(blip.ring, Ring::Trial);
        assert_eq!(blip.status, Status::MovedIn);
        assert_eq!(blip.tags.len(), 2);
        assert_eq!(blip.since, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(blip.history.len(), 2);
        assert_eq!(blip.history[0].pr.as_deref(), Some("#123"));
        assert_eq!(blip.history[1].pr, None);
    }

    #[test]
    fn test_defaults_for_missing_lists() {
        let blip = parse_blip(&json!({
            "name": "Rust",
            "quadrant": "Languages & Frameworks",
            "ring": "Adopt",
            "status": "New",
            "summary": null
        }))
        .unwrap();

        assert!(blip.tags.is_empty());
        assert!(blip.owners.is_empty());
        assert!(blip.links.is_empty());
        assert!(blip.history.is_empty());
        assert_eq!(blip.summary, None);
        assert_eq!(blip.slug, "rust");
    }

    #[test]
    fn test_reports_every_violation() {
        let err = parse_blip(&json!({
            "name": "",
            "ring": "Maybe",
            "status": "Moved",
            "since": "June 2023",
            "links": [{ "title": "", "url": "not a url" }],
            "history": [
                { "date": "2023-6-1", "ring": "Assess", "note": "x", "pr": "123" },
                { "ring": "Trial", "note": "" }
            ]
        }))
        .unwrap_err();

        let paths = paths(&err);
        assert!(paths.contains(&"name"));
        assert!(paths.contains(&"quadrant"));
        assert!(paths.contains(&"ring"));
        assert!(paths.contains(&"status"));
        assert!(paths.contains(&"since"));
        assert!(paths.contains(&"links.0.title"));
        assert!(paths.contains(&"links.0.url"));
        assert!(paths.contains(&"history.0.date"));
        assert!(paths.contains(&"history.0.pr"));
        assert!(paths.contains(&"history.1.date"));
        assert!(paths.contains(&"history.1.note"));
    }

    #[test]
    fn test_enum_message_lists_choices() {
        let mut raw = valid_blip();
        raw["ring"] = json!("Maybe");
        let err = parse_blip(&raw).unwrap_err();

        assert_eq!(err.violations.len(), 1);
        assert_eq!(
            err.violations[0].reason,
            "Invalid enum value. Expected 'Adopt' | 'Trial' | 'Assess' | 'Hold', received 'Maybe'"
        );
    }

    #[test]
    fn test_rejects_impossible_calendar_date() {
        let mut raw = valid_blip();
        raw["history"][0]["date"] = json!("2023-02-30");
        let err = parse_blip(&raw).unwrap_err();

        assert_eq!(paths(&err), vec!["history.0.date"]);
        assert!(err.violations[0].reason.contains("2023-02-30"));
    }

    #[test]
    fn test_rejects_wrong_types() {
        let err = parse_blip(&json!({
            "name": 42,
            "quadrant": "Tools",
            "ring": "Hold",
            "status": "No Change",
            "tags": "rust",
            "owners": ["@a", 7]
        }))
        .unwrap_err();

        let messages = err.messages();
        assert!(messages.contains(&"name: Expected string, received number".to_string()));
        assert!(messages.contains(&"tags: Expected array, received string".to_string()));
        assert!(messages.contains(&"owners.1: Expected string, received number".to_string()));
    }

    #[test]
    fn test_non_object_record() {
        let err = parse_blip(&json!(["not", "a", "mapping"])).unwrap_err();
        assert_eq!(err.messages(), vec!["Expected object, received array"]);
    }

    #[test]
    fn test_parse_history_entry() {
        let entry = parse_history_entry(&json!({
            "date": "2024-01-15",
            "ring": "Trial",
            "note": "Pilot successful",
            "pr": "#456"
        }))
        .unwrap();
        assert_eq!(entry.ring, Ring::Trial);
        assert_eq!(entry.pr.as_deref(), Some("#456"));

        let err = parse_history_entry(&json!({ "date": "2024-01-15", "ring": "Trial" })).unwrap_err();
        assert_eq!(err.messages(), vec!["note: Required"]);
    }

    #[test]
    fn test_parse_link() {
        assert!(parse_link(&json!({ "title": "Home", "url": "https://example.com" })).is_ok());
        let err = parse_link(&json!({ "title": "Home", "url": "/relative/path" })).unwrap_err();
        assert_eq!(err.messages(), vec!["url: Must be a valid URL"]);
    }

    #[test]
    fn test_pattern_helpers() {
        assert!(is_pr_reference("#1"));
        assert!(!is_pr_reference("#"));
        assert!(!is_pr_reference("12"));
        assert!(is_hex_color("#00aaFF"));
        assert!(!is_hex_color("#00aaF"));
        assert!(!is_hex_color("00aaFF"));
    }
}
