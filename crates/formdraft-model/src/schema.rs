use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::{FieldMap, FieldValue};

/// Declared kind of a field, driving the type/format validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    /// ISO calendar date, carried as text in `YYYY-MM-DD` form.
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Date => "date",
        }
    }

    /// Integer and decimal fields accept numeric values and numeric text.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Decimal)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative metadata for one field of the parent record or of a child row.
///
/// Constructed builder-style:
///
/// ```
/// use formdraft_model::FieldSpec;
///
/// let spec = FieldSpec::text("code")
///     .required()
///     .with_max_length(8)
///     .with_pattern("^[A-Z]+$")
///     .with_label("Short code");
/// assert!(spec.required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Regex source, compiled once when an editor is built over the schema.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Closed list of accepted values. Matching strictness is an editor
    /// option.
    #[serde(default)]
    pub one_of: Option<Vec<String>>,
    /// Child fields only: no two rows may carry the same non-empty value.
    #[serde(default)]
    pub unique_within_children: bool,
    /// Value a fresh row starts with for this field.
    #[serde(default)]
    pub default: FieldValue,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: false,
            max_length: None,
            pattern: None,
            one_of: None,
            unique_within_children: false,
            default: FieldValue::Empty,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Decimal)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_max_length(mut self, limit: usize) -> Self {
        self.max_length = Some(limit);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn unique_within_children(mut self) -> Self {
        self.unique_within_children = true;
        self
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = value;
        self
    }
}

/// The declared shape of an editable form: ordered parent fields plus
/// ordered child-row fields.
///
/// Construction rejects empty and duplicate field names, empty allowed-value
/// lists, and cross-row uniqueness declared on a parent field, so consumers
/// can rely on a `FormSchema` being well formed.
#[derive(Debug, Clone)]
pub struct FormSchema {
    parent: Vec<FieldSpec>,
    child: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(parent: Vec<FieldSpec>, child: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        Self::check_section("parent", &parent, false)?;
        Self::check_section("child", &child, true)?;
        Ok(Self { parent, child })
    }

    fn check_section(
        section: &'static str,
        fields: &[FieldSpec],
        cross_row_rules: bool,
    ) -> Result<(), SchemaError> {
        let mut seen = BTreeSet::new();
        for field in fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName { section });
            }
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField {
                    section,
                    name: field.name.clone(),
                });
            }
            if let Some(values) = &field.one_of {
                if values.is_empty() {
                    return Err(SchemaError::EmptyAllowedValues {
                        field: field.name.clone(),
                    });
                }
            }
            if field.unique_within_children && !cross_row_rules {
                return Err(SchemaError::UniqueOnParentField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn parent_fields(&self) -> &[FieldSpec] {
        &self.parent
    }

    pub fn child_fields(&self) -> &[FieldSpec] {
        &self.child
    }

    pub fn parent_field(&self, name: &str) -> Option<&FieldSpec> {
        self.parent.iter().find(|field| field.name == name)
    }

    pub fn child_field(&self, name: &str) -> Option<&FieldSpec> {
        self.child.iter().find(|field| field.name == name)
    }

    /// Every declared parent field at its default value.
    pub fn default_parent_fields(&self) -> FieldMap {
        Self::defaults(&self.parent)
    }

    /// Every declared child field at its default value.
    pub fn default_child_fields(&self) -> FieldMap {
        Self::defaults(&self.child)
    }

    fn defaults(fields: &[FieldSpec]) -> FieldMap {
        fields
            .iter()
            .map(|field| (field.name.clone(), field.default.clone()))
            .collect()
    }
}
