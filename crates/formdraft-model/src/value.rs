use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field name to current value, for one scope of a draft or record.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Runtime value of a single field.
///
/// Dates travel as `Text` in `YYYY-MM-DD` form; whether a value conforms to
/// its declared kind is the validator's concern, not the value's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Empty,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        FieldValue::Number(value)
    }

    /// Empty, or text that is blank after trimming. Validation treats both
    /// as "not provided".
    pub fn is_empty_value(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Empty
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_empty() {
        assert!(FieldValue::Empty.is_empty_value());
        assert!(FieldValue::text("   ").is_empty_value());
        assert!(!FieldValue::text("x").is_empty_value());
        assert!(!FieldValue::number(0.0).is_empty_value());
    }

    #[test]
    fn untagged_wire_shapes() {
        assert_eq!(
            serde_json::to_string(&FieldValue::text("ok")).expect("serialize"),
            "\"ok\""
        );
        assert_eq!(
            serde_json::to_string(&FieldValue::number(2.5)).expect("serialize"),
            "2.5"
        );
        assert_eq!(
            serde_json::to_string(&FieldValue::Empty).expect("serialize"),
            "null"
        );
        let round: FieldValue = serde_json::from_str("null").expect("deserialize");
        assert_eq!(round, FieldValue::Empty);
    }
}
