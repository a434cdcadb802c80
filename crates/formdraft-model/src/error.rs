use thiserror::Error;

/// Faults in the declared field schema, detected at construction or rule
/// compilation time. A schema that passes construction never fails later.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("empty field name in {section} fields")]
    EmptyFieldName { section: &'static str },
    #[error("duplicate {section} field `{name}`")]
    DuplicateField {
        section: &'static str,
        name: String,
    },
    #[error("field `{field}` declares an empty allowed-value list")]
    EmptyAllowedValues { field: String },
    #[error("parent field `{field}` declares unique_within_children")]
    UniqueOnParentField { field: String },
    #[error("invalid pattern for field `{field}`: {reason}")]
    InvalidPattern { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
