use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ids::DraftId;

/// Where an edit or a validation finding applies: the parent record's own
/// fields, or one child row addressed by its draft id.
///
/// Orders parent first, then children by draft id, so reports render in
/// form order. Serializes as `"parent"` or `"child:<id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    Parent,
    Child(DraftId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Parent => f.write_str("parent"),
            Scope::Child(id) => write!(f, "child:{id}"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "parent" {
            return Ok(Scope::Parent);
        }
        if let Some(raw) = s.strip_prefix("child:") {
            let id = raw
                .parse::<u64>()
                .map_err(|_| format!("invalid child scope `{s}`"))?;
            return Ok(Scope::Child(DraftId(id)));
        }
        Err(format!("invalid scope `{s}`"))
    }
}

impl serde::Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Scope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Field errors for one scope: field name to ordered messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Outcome of a full validation pass over a draft.
///
/// Scopes without findings are absent, never present with an empty list, so
/// `is_empty` and per-scope lookups agree with what a UI should highlight.
/// Each pass produces a fresh report; reports are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    scopes: BTreeMap<Scope, FieldErrors>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finding. The scope and field entries are created on
    /// first use, which keeps the absent-when-clean invariant: an entry
    /// exists only if at least one message was recorded against it.
    pub fn add(&mut self, scope: Scope, field: impl Into<String>, message: impl Into<String>) {
        self.scopes
            .entry(scope)
            .or_default()
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Total number of messages across all scopes and fields.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.scopes
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.scopes.keys().copied()
    }

    #[must_use]
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains_key(&scope)
    }

    #[must_use]
    pub fn fields_for(&self, scope: Scope) -> Option<&FieldErrors> {
        self.scopes.get(&scope)
    }

    /// Messages for one field of one scope; empty when the field is clean.
    pub fn messages_for(&self, scope: Scope, field: &str) -> &[String] {
        self.scopes
            .get(&scope)
            .and_then(|fields| fields.get(field))
            .map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Scope, &FieldErrors)> + '_ {
        self.scopes.iter().map(|(scope, fields)| (*scope, fields))
    }
}
