//! Typed field projection.
//!
//! A projection names the fields each hit returns, the column label used to
//! display them, and the value type the caller expects. The index returns
//! projected values with their stored types; [`Projection::row`] checks a
//! hit against the declared types instead of asserting types ad hoc.

use serde::{Deserialize, Serialize};

use crate::document::FieldValue;
use crate::error::{Result, UserSearchError};
use crate::search::Hit;

/// Expected value type of a projected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Text value
    Text,
    /// Integer value
    Integer,
    /// Floating point value
    Float,
    /// Boolean value
    Boolean,
    /// DateTime value
    DateTime,
}

impl FieldKind {
    /// Check if a value has this kind.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Text, FieldValue::Text(_))
                | (FieldKind::Integer, FieldValue::Integer(_))
                | (FieldKind::Float, FieldValue::Float(_))
                | (FieldKind::Boolean, FieldValue::Boolean(_))
                | (FieldKind::DateTime, FieldValue::DateTime(_))
        )
    }

    /// Whether values of this kind are numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }

    fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::DateTime => "datetime",
        }
    }
}

/// One projected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedField {
    /// Stored field name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Declared value type.
    pub kind: FieldKind,
}

/// Ordered list of projected fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Projection {
    fields: Vec<ProjectedField>,
}

impl Projection {
    /// Create an empty projection.
    pub fn new() -> Self {
        Projection { fields: Vec::new() }
    }

    /// Append a projected field.
    pub fn with_field<N: Into<String>, L: Into<String>>(
        mut self,
        name: N,
        label: L,
        kind: FieldKind,
    ) -> Self {
        self.fields.push(ProjectedField {
            name: name.into(),
            label: label.into(),
            kind,
        });
        self
    }

    /// Get the projected fields in order.
    pub fn fields(&self) -> &[ProjectedField] {
        &self.fields
    }

    /// Get the projected field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Get the display labels in order.
    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.label.as_str()).collect()
    }

    /// Get the number of projected fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing is projected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read a hit's projected values in projection order.
    ///
    /// A missing field yields `None`. A field present with a type other than
    /// the declared one is a contract violation.
    pub fn row<'h>(&self, hit: &'h Hit) -> Result<Vec<Option<&'h FieldValue>>> {
        self.fields
            .iter()
            .map(|field| match hit.fields.get(&field.name) {
                None | Some(FieldValue::Null) => Ok(None),
                Some(value) if field.kind.accepts(value) => Ok(Some(value)),
                Some(value) => Err(UserSearchError::contract(format!(
                    "field '{}' of hit '{}' is {} but the projection declares {}",
                    field.name,
                    hit.id,
                    value.type_name(),
                    field.kind.name()
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn projection() -> Projection {
        Projection::new()
            .with_field("id", "#", FieldKind::Integer)
            .with_field("firstname", "First Name", FieldKind::Text)
    }

    fn hit(fields: Vec<(&str, FieldValue)>) -> Hit {
        Hit {
            id: "1000".into(),
            score: 1.0,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_projection_order() {
        let projection = projection();

        assert_eq!(projection.field_names(), vec!["id", "firstname"]);
        assert_eq!(projection.labels(), vec!["#", "First Name"]);
        assert_eq!(projection.len(), 2);
    }

    #[test]
    fn test_row_accepts_declared_types() {
        let hit = hit(vec![
            ("id", FieldValue::Integer(1000)),
            ("firstname", FieldValue::Text("Jane".into())),
        ]);

        let row = projection().row(&hit).unwrap();
        assert_eq!(row[0], Some(&FieldValue::Integer(1000)));
        assert_eq!(row[1], Some(&FieldValue::Text("Jane".into())));
    }

    #[test]
    fn test_row_missing_field() {
        let hit = hit(vec![("id", FieldValue::Integer(1000))]);

        let row = projection().row(&hit).unwrap();
        assert_eq!(row[1], None);
    }

    #[test]
    fn test_row_type_mismatch() {
        let hit = hit(vec![
            ("id", FieldValue::Text("1000".into())),
            ("firstname", FieldValue::Text("Jane".into())),
        ]);

        let err = projection().row(&hit).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_kind_accepts() {
        assert!(FieldKind::Integer.accepts(&FieldValue::Integer(1)));
        assert!(!FieldKind::Integer.accepts(&FieldValue::Float(1.0)));
        assert!(FieldKind::Float.is_numeric());
        assert!(!FieldKind::Text.is_numeric());
    }
}
