//! Front matter model and the Shamsi date transform
//!
//! A [`ParsedContent`] keeps the metadata block in the syntax it was written
//! in, so that keys, key order and value types survive the rewrite. The
//! transform itself only ever reads the publish date and writes one field.

use crate::core::calendar::to_shamsi_string;
use crate::error::{HoorError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::PathBuf;

/// Key holding the page's publish date
pub const DATE_KEY: &str = "date";

/// Key the rendered Shamsi date is written to
pub const SHAMSI_DATE_KEY: &str = "shamsiDate";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Syntax of a metadata block, identified by its fence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `---` fenced YAML
    Yaml,
    /// `+++` fenced TOML
    Toml,
    /// A bare JSON object
    Json,
}

/// Ordered metadata mapping in its original syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    Yaml(serde_yaml::Mapping),
    Toml(toml::Table),
    Json(serde_json::Map<String, serde_json::Value>),
}

impl Metadata {
    pub fn delimiter(&self) -> Delimiter {
        match self {
            Self::Yaml(_) => Delimiter::Yaml,
            Self::Toml(_) => Delimiter::Toml,
            Self::Json(_) => Delimiter::Json,
        }
    }

    /// Keys in block order. Non-string YAML keys are skipped.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Yaml(map) => map
                .keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect(),
            Self::Toml(table) => table.keys().cloned().collect(),
            Self::Json(map) => map.keys().cloned().collect(),
        }
    }

    /// Text form of the value under `key`, matched case-insensitively.
    ///
    /// Null values count as absent. Non-string scalars are returned in their
    /// textual form so that callers can report them.
    pub fn text(&self, key: &str) -> Option<String> {
        match self {
            Self::Yaml(map) => map
                .iter()
                .find(|(k, _)| k.as_str().is_some_and(|k| k.eq_ignore_ascii_case(key)))
                .and_then(|(_, v)| yaml_text(v)),
            Self::Toml(table) => table
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| match v {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Datetime(dt) => dt.to_string(),
                    other => other.to_string(),
                }),
            Self::Json(map) => map
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .and_then(|(_, v)| match v {
                    serde_json::Value::Null => None,
                    serde_json::Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                }),
        }
    }

    /// Insert or overwrite a string field. An existing key keeps its position.
    pub fn set_text(&mut self, key: &str, value: String) {
        match self {
            Self::Yaml(map) => {
                map.insert(
                    serde_yaml::Value::String(key.to_string()),
                    serde_yaml::Value::String(value),
                );
            }
            Self::Toml(table) => {
                table.insert(key.to_string(), toml::Value::String(value));
            }
            Self::Json(map) => {
                map.insert(key.to_string(), serde_json::Value::String(value));
            }
        }
    }
}

fn yaml_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}

/// A content file split into its metadata block and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedContent {
    pub metadata: Metadata,
    /// Everything after the closing fence, byte for byte
    pub body: Vec<u8>,
}

impl ParsedContent {
    pub fn new(metadata: Metadata, body: Vec<u8>) -> Self {
        Self { metadata, body }
    }

    pub fn delimiter(&self) -> Delimiter {
        self.metadata.delimiter()
    }
}

/// What the transform did to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The Shamsi field was written with this value
    Converted(String),
    /// No front matter or no publish date
    NoDate,
    /// The date parsed but the template rendered to nothing
    Unrenderable,
}

impl ConversionOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }
}

/// Parse a publish date: RFC 3339 timestamp first, then a bare date.
///
/// Timestamps keep the calendar day of their own offset.
pub fn parse_publish_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|datetime| datetime.date())
}

/// Add the Shamsi rendering of the publish date to `content`.
///
/// Leaves `content` untouched unless the outcome is
/// [`ConversionOutcome::Converted`]. An unparseable date is an
/// [`HoorError::InvalidDate`] without a path; callers attach it with
/// [`HoorError::at`].
pub fn apply_shamsi_date(content: &mut ParsedContent, template: &str) -> Result<ConversionOutcome> {
    let Some(raw) = content.metadata.text(DATE_KEY) else {
        return Ok(ConversionOutcome::NoDate);
    };

    let date = parse_publish_date(&raw).ok_or_else(|| HoorError::invalid_date(PathBuf::new(), raw))?;

    let rendered = to_shamsi_string(date, template);
    if rendered.trim().is_empty() {
        return Ok(ConversionOutcome::Unrenderable);
    }

    content.metadata.set_text(SHAMSI_DATE_KEY, rendered.clone());
    Ok(ConversionOutcome::Converted(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::DEFAULT_DATE_FORMAT;
    use pretty_assertions::assert_eq;

    fn yaml_content(src: &str) -> ParsedContent {
        let map: serde_yaml::Mapping = serde_yaml::from_str(src).unwrap();
        ParsedContent::new(Metadata::Yaml(map), b"body\n".to_vec())
    }

    #[test]
    fn test_parse_publish_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 21);
        assert_eq!(parse_publish_date("2021-03-21"), expected);
        assert_eq!(parse_publish_date("2021-03-21T10:00:00Z"), expected);
        assert_eq!(parse_publish_date("2021-03-21T10:00:00+03:30"), expected);
        assert_eq!(parse_publish_date("2021-03-21T10:00:00"), expected);
        assert_eq!(parse_publish_date("2021-03-21 23:59:59.25"), expected);
        assert_eq!(parse_publish_date("  2021-03-21\n"), expected);
        assert_eq!(parse_publish_date("not-a-date"), None);
        assert_eq!(parse_publish_date("2021-13-01"), None);
    }

    #[test]
    fn test_timestamp_keeps_its_own_day() {
        // 23:30 at -05:00 is already the next day in UTC.
        assert_eq!(
            parse_publish_date("2021-03-20T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2021, 3, 20)
        );
    }

    #[test]
    fn test_apply_adds_single_field() {
        let mut content = yaml_content("title: Hello\ndate: 2021-03-21T10:00:00Z\ntags: [a]\n");
        let outcome = apply_shamsi_date(&mut content, DEFAULT_DATE_FORMAT).unwrap();

        assert_eq!(outcome, ConversionOutcome::Converted("۰۱ ۰۱ ۱۴۰۰".to_string()));
        assert_eq!(content.metadata.keys(), vec!["title", "date", "tags", SHAMSI_DATE_KEY]);
        assert_eq!(content.metadata.text(SHAMSI_DATE_KEY).as_deref(), Some("۰۱ ۰۱ ۱۴۰۰"));
        assert_eq!(content.body, b"body\n");
    }

    #[test]
    fn test_bare_date_matches_timestamp() {
        let mut bare = yaml_content("date: 2021-03-21\n");
        let mut stamped = yaml_content("date: \"2021-03-21T10:00:00Z\"\n");
        assert_eq!(
            apply_shamsi_date(&mut bare, DEFAULT_DATE_FORMAT).unwrap(),
            apply_shamsi_date(&mut stamped, DEFAULT_DATE_FORMAT).unwrap()
        );
    }

    #[test]
    fn test_missing_date_is_noop() {
        let mut content = yaml_content("title: Hello\n");
        let before = content.clone();
        assert_eq!(
            apply_shamsi_date(&mut content, DEFAULT_DATE_FORMAT).unwrap(),
            ConversionOutcome::NoDate
        );
        assert_eq!(content, before);

        let mut null_date = yaml_content("date: ~\n");
        assert_eq!(
            apply_shamsi_date(&mut null_date, DEFAULT_DATE_FORMAT).unwrap(),
            ConversionOutcome::NoDate
        );
    }

    #[test]
    fn test_invalid_date_is_error() {
        let mut content = yaml_content("date: not-a-date\n");
        let err = apply_shamsi_date(&mut content, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, HoorError::InvalidDate { ref value, .. } if value == "not-a-date"));
        assert!(content.metadata.text(SHAMSI_DATE_KEY).is_none());
    }

    #[test]
    fn test_empty_rendering_is_noop() {
        let mut content = yaml_content("date: 2021-03-21\n");
        assert_eq!(
            apply_shamsi_date(&mut content, "").unwrap(),
            ConversionOutcome::Unrenderable
        );
        assert!(content.metadata.text(SHAMSI_DATE_KEY).is_none());
    }

    #[test]
    fn test_rerun_overwrites_in_place() {
        let mut content = yaml_content("date: 2021-03-21\nshamsiDate: stale\ndraft: true\n");
        apply_shamsi_date(&mut content, DEFAULT_DATE_FORMAT).unwrap();
        let first = content.clone();
        apply_shamsi_date(&mut content, DEFAULT_DATE_FORMAT).unwrap();

        assert_eq!(content, first);
        assert_eq!(content.metadata.keys(), vec!["date", SHAMSI_DATE_KEY, "draft"]);
    }

    #[test]
    fn test_date_key_is_case_insensitive() {
        let mut content = yaml_content("Date: 2020-03-20\n");
        assert_eq!(
            apply_shamsi_date(&mut content, "yyyy").unwrap(),
            ConversionOutcome::Converted("۱۳۹۹".to_string())
        );
    }

    #[test]
    fn test_toml_datetime_value() {
        let table: toml::Table = toml::from_str("title = \"x\"\ndate = 2021-03-21T10:00:00Z\n").unwrap();
        let mut content = ParsedContent::new(Metadata::Toml(table), Vec::new());
        assert_eq!(content.delimiter(), Delimiter::Toml);

        let outcome = apply_shamsi_date(&mut content, DEFAULT_DATE_FORMAT).unwrap();
        assert!(outcome.is_converted());
        assert_eq!(content.metadata.keys(), vec!["title", "date", SHAMSI_DATE_KEY]);
    }

    #[test]
    fn test_json_metadata() {
        let map = serde_json::from_str(r#"{"date": "2024-01-01", "title": "x"}"#).unwrap();
        let mut content = ParsedContent::new(Metadata::Json(map), Vec::new());

        apply_shamsi_date(&mut content, "d MMM").unwrap();
        assert_eq!(content.metadata.text(SHAMSI_DATE_KEY).as_deref(), Some("۱۱ دی"));
    }
}
