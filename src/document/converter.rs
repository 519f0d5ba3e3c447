//! JSON document converter.
//!
//! Converts JSON objects (or any `Serialize` value that serializes to one)
//! into Documents:
//! ```json
//! {
//!   "firstname": "Jane",
//!   "age": 30,
//!   "created_at": "2019-06-01"
//! }
//! ```
//!
//! Integers become [`FieldValue::Integer`], other numbers
//! [`FieldValue::Float`]. Strings that read as a calendar date
//! (`YYYY-MM-DD`) or an RFC 3339 timestamp become [`FieldValue::DateTime`];
//! all other strings are text.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::document::document::Document;
use crate::document::field_value::FieldValue;
use crate::error::{Result, UserSearchError};

/// A document converter for JSON values.
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentConverter;

impl JsonDocumentConverter {
    /// Create a new JSON converter.
    pub fn new() -> Self {
        JsonDocumentConverter
    }

    /// Convert anything that serializes to a JSON object.
    pub fn convert_serialize<T: Serialize>(&self, item: &T) -> Result<Document> {
        let value = serde_json::to_value(item)?;
        self.convert_value(value)
    }

    /// Convert an already parsed JSON value.
    pub fn convert_value(&self, value: Value) -> Result<Document> {
        let Value::Object(map) = value else {
            return Err(UserSearchError::field(
                "JSON document must be an object",
            ));
        };

        let mut doc = Document::new();
        for (name, value) in map {
            let field_value = self.infer_field_value(&name, value)?;
            doc.add_field(name, field_value);
        }

        Ok(doc)
    }

    /// Infer the field value type from a JSON value.
    fn infer_field_value(&self, name: &str, value: Value) -> Result<FieldValue> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Boolean(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(FieldValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(FieldValue::Float(f))
                } else {
                    Err(UserSearchError::field(format!(
                        "Field '{name}' holds a number out of range: {n}"
                    )))
                }
            }
            Value::String(s) => match parse_datetime(&s) {
                Some(dt) => Ok(FieldValue::DateTime(dt)),
                None => Ok(FieldValue::Text(s)),
            },
            Value::Array(_) | Value::Object(_) => Err(UserSearchError::field(format!(
                "Field '{name}' is nested; only flat documents are supported"
            ))),
        }
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_type_inference() {
        let converter = JsonDocumentConverter::new();
        let doc = converter
            .convert_value(json!({
                "firstname": "Jane",
                "age": 30,
                "score": 1.5,
                "active": true,
                "created_at": "2019-06-01"
            }))
            .unwrap();

        assert!(matches!(doc.get_field("firstname"), Some(FieldValue::Text(_))));
        assert!(matches!(doc.get_field("age"), Some(FieldValue::Integer(30))));
        assert!(matches!(doc.get_field("score"), Some(FieldValue::Float(_))));
        assert!(matches!(doc.get_field("active"), Some(FieldValue::Boolean(true))));
        assert_eq!(
            doc.get_field("created_at").and_then(|v| v.as_datetime()),
            Some(&Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_ids_beyond_i64_are_not_integers() {
        let converter = JsonDocumentConverter::new();
        let doc = converter.convert_value(json!({ "id": u64::MAX })).unwrap();

        assert!(matches!(doc.get_field("id"), Some(FieldValue::Float(_))));
    }

    #[test]
    fn test_rejects_non_object() {
        let converter = JsonDocumentConverter::new();

        assert!(converter.convert_value(json!([1, 2, 3])).is_err());
        assert!(converter.convert_value(json!({ "tags": ["a", "b"] })).is_err());
    }

    #[test]
    fn test_parse_datetime() {
        assert!(parse_datetime("2020-03-03").is_some());
        assert!(parse_datetime("2020-03-03T10:00:00Z").is_some());
        assert!(parse_datetime("Tuesday 3 Mar 2020").is_none());
        assert!(parse_datetime("female").is_none());
    }
}
