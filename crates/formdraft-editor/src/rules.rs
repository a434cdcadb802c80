use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use formdraft_model::{
    DraftId, FieldKind, FieldMap, FieldSpec, FieldValue, FormSchema, SchemaError, Scope,
    ValidationReport,
};

use crate::options::{EditorOptions, ValueMatching};

const DATE_MESSAGE: &str = "must be a valid date in YYYY-MM-DD form";

/// Zero-padded `YYYY-MM-DD` shape. Chrono alone would also accept
/// unpadded components like `2024-1-5`.
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid date shape regex"));

/// Compiled checks for one declared field.
#[derive(Debug)]
struct FieldRule {
    field: String,
    kind: FieldKind,
    required: bool,
    max_length: Option<usize>,
    pattern: Option<CompiledPattern>,
    one_of: Option<Vec<String>>,
}

#[derive(Debug)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

/// A schema compiled into executable validation rules.
///
/// Compilation happens once, when an editor is built over the schema; a bad
/// regex surfaces there instead of on every validation pass. Execution is
/// pure: rules read field maps and append findings to a report.
#[derive(Debug)]
pub(crate) struct RuleSet {
    parent: Vec<FieldRule>,
    child: Vec<FieldRule>,
    unique_child_fields: Vec<String>,
}

impl RuleSet {
    pub(crate) fn compile(schema: &FormSchema) -> Result<Self, SchemaError> {
        Ok(Self {
            parent: compile_section(schema.parent_fields())?,
            child: compile_section(schema.child_fields())?,
            unique_child_fields: schema
                .child_fields()
                .iter()
                .filter(|field| field.unique_within_children)
                .map(|field| field.name.clone())
                .collect(),
        })
    }

    pub(crate) fn check_parent(
        &self,
        fields: &FieldMap,
        options: &EditorOptions,
        report: &mut ValidationReport,
    ) {
        check_fields(&self.parent, Scope::Parent, fields, options, report);
    }

    pub(crate) fn check_child(
        &self,
        scope: Scope,
        fields: &FieldMap,
        options: &EditorOptions,
        report: &mut ValidationReport,
    ) {
        check_fields(&self.child, scope, fields, options, report);
    }

    /// Cross-row pass: flags every row carrying a duplicated non-empty
    /// value for a field declared unique within the child collection.
    pub(crate) fn check_unique_children<'a, I>(&self, rows: I, report: &mut ValidationReport)
    where
        I: IntoIterator<Item = (DraftId, &'a FieldMap)>,
    {
        if self.unique_child_fields.is_empty() {
            return;
        }
        let mut seen: BTreeMap<&str, BTreeMap<String, Vec<DraftId>>> = BTreeMap::new();
        for (draft_id, fields) in rows {
            for field in &self.unique_child_fields {
                let Some(value) = fields.get(field) else {
                    continue;
                };
                if value.is_empty_value() {
                    continue;
                }
                seen.entry(field.as_str())
                    .or_default()
                    .entry(unique_key(value))
                    .or_default()
                    .push(draft_id);
            }
        }
        for (field, groups) in &seen {
            for (key, ids) in groups {
                if ids.len() < 2 {
                    continue;
                }
                for draft_id in ids {
                    report.add(
                        Scope::Child(*draft_id),
                        *field,
                        format!("must be unique across rows (duplicate `{key}`)"),
                    );
                }
            }
        }
    }
}

fn compile_section(fields: &[FieldSpec]) -> Result<Vec<FieldRule>, SchemaError> {
    fields
        .iter()
        .map(|spec| {
            let pattern = match &spec.pattern {
                Some(source) => {
                    let regex = Regex::new(source).map_err(|err| SchemaError::InvalidPattern {
                        field: spec.name.clone(),
                        reason: err.to_string(),
                    })?;
                    Some(CompiledPattern {
                        source: source.clone(),
                        regex,
                    })
                }
                None => None,
            };
            Ok(FieldRule {
                field: spec.name.clone(),
                kind: spec.kind,
                required: spec.required,
                max_length: spec.max_length,
                pattern,
                one_of: spec.one_of.clone(),
            })
        })
        .collect()
}

fn check_fields(
    rules: &[FieldRule],
    scope: Scope,
    fields: &FieldMap,
    options: &EditorOptions,
    report: &mut ValidationReport,
) {
    let missing = FieldValue::Empty;
    for rule in rules {
        let value = fields.get(&rule.field).unwrap_or(&missing);

        // A blank value is "not provided": it fails the required check and
        // nothing else.
        if value.is_empty_value() {
            if rule.required {
                report.add(scope, &rule.field, "is required");
            }
            continue;
        }

        if let Some(message) = kind_message(rule.kind, value) {
            report.add(scope, &rule.field, message);
        }

        if let Some(limit) = rule.max_length {
            if let Some(text) = value.as_text() {
                if text.chars().count() > limit {
                    report.add(
                        scope,
                        &rule.field,
                        format!("must be at most {limit} characters"),
                    );
                }
            }
        }

        if let Some(pattern) = &rule.pattern {
            if let Some(text) = value.as_text() {
                if !pattern.regex.is_match(text) {
                    report.add(
                        scope,
                        &rule.field,
                        format!("must match pattern `{}`", pattern.source),
                    );
                }
            }
        }

        if let Some(allowed) = &rule.one_of {
            if !matches_allowed(value, allowed, options.value_matching) {
                report.add(
                    scope,
                    &rule.field,
                    format!("must be one of: {}", allowed.join(", ")),
                );
            }
        }
    }
}

fn kind_message(kind: FieldKind, value: &FieldValue) -> Option<&'static str> {
    match kind {
        FieldKind::Text => None,
        FieldKind::Integer => match value {
            FieldValue::Number(n) => (n.fract() != 0.0).then_some("must be a whole number"),
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.parse::<i64>().is_ok() {
                    None
                } else if trimmed.parse::<f64>().is_ok() {
                    Some("must be a whole number")
                } else {
                    Some("must be a number")
                }
            }
            FieldValue::Empty => None,
        },
        FieldKind::Decimal => match value {
            FieldValue::Number(_) => None,
            FieldValue::Text(text) => {
                if text.trim().parse::<f64>().is_ok() {
                    None
                } else {
                    Some("must be a number")
                }
            }
            FieldValue::Empty => None,
        },
        FieldKind::Date => match value {
            FieldValue::Number(_) => Some(DATE_MESSAGE),
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                if DATE_SHAPE.is_match(trimmed)
                    && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
                {
                    None
                } else {
                    Some(DATE_MESSAGE)
                }
            }
            FieldValue::Empty => None,
        },
    }
}

fn matches_allowed(value: &FieldValue, allowed: &[String], mode: ValueMatching) -> bool {
    let rendered = value.to_string();
    match mode {
        ValueMatching::Strict => allowed.contains(&rendered),
        ValueMatching::Lenient => {
            let needle = rendered.trim();
            allowed
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(needle))
        }
    }
}

/// Duplicate detection compares trimmed rendered values; numbers render
/// canonically, so `3` and `3.0` collide as intended.
fn unique_key(value: &FieldValue) -> String {
    value.to_string().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(parent: Vec<FieldSpec>, child: Vec<FieldSpec>) -> RuleSet {
        let schema = FormSchema::new(parent, child).expect("schema");
        RuleSet::compile(&schema).expect("rule set")
    }

    fn parent_messages(rules: &RuleSet, fields: &FieldMap, field: &str) -> Vec<String> {
        let mut report = ValidationReport::new();
        rules.check_parent(fields, &EditorOptions::default(), &mut report);
        report.messages_for(Scope::Parent, field).to_vec()
    }

    #[test]
    fn bad_pattern_fails_compilation() {
        let schema = FormSchema::new(vec![FieldSpec::text("code").with_pattern("([")], vec![])
            .expect("schema");
        let err = RuleSet::compile(&schema).expect_err("compile should fail");
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn required_fires_only_on_blank_values() {
        let rules = compile(vec![FieldSpec::text("title").required()], vec![]);
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), FieldValue::text("  "));
        assert_eq!(parent_messages(&rules, &fields, "title"), vec!["is required"]);

        fields.insert("title".to_string(), FieldValue::text("ok"));
        assert!(parent_messages(&rules, &fields, "title").is_empty());
    }

    #[test]
    fn blank_optional_value_produces_no_findings() {
        let rules = compile(
            vec![FieldSpec::integer("priority").with_max_length(2)],
            vec![],
        );
        let mut fields = FieldMap::new();
        fields.insert("priority".to_string(), FieldValue::Empty);
        assert!(parent_messages(&rules, &fields, "priority").is_empty());
    }

    #[test]
    fn integer_rejects_fractions_and_garbage() {
        let rules = compile(vec![FieldSpec::integer("priority")], vec![]);
        let mut fields = FieldMap::new();

        fields.insert("priority".to_string(), FieldValue::text("3"));
        assert!(parent_messages(&rules, &fields, "priority").is_empty());

        fields.insert("priority".to_string(), FieldValue::number(2.5));
        assert_eq!(
            parent_messages(&rules, &fields, "priority"),
            vec!["must be a whole number"]
        );

        fields.insert("priority".to_string(), FieldValue::text("high"));
        assert_eq!(
            parent_messages(&rules, &fields, "priority"),
            vec!["must be a number"]
        );
    }

    #[test]
    fn date_requires_a_real_calendar_day() {
        let rules = compile(vec![FieldSpec::date("due")], vec![]);
        let mut fields = FieldMap::new();

        fields.insert("due".to_string(), FieldValue::text("2024-02-29"));
        assert!(parent_messages(&rules, &fields, "due").is_empty());

        fields.insert("due".to_string(), FieldValue::text("2023-02-29"));
        assert_eq!(parent_messages(&rules, &fields, "due"), vec![DATE_MESSAGE]);

        fields.insert("due".to_string(), FieldValue::number(20230201.0));
        assert_eq!(parent_messages(&rules, &fields, "due"), vec![DATE_MESSAGE]);
    }

    #[test]
    fn date_requires_zero_padded_components() {
        let rules = compile(vec![FieldSpec::date("due")], vec![]);
        let mut fields = FieldMap::new();

        fields.insert("due".to_string(), FieldValue::text("2024-01-05"));
        assert!(parent_messages(&rules, &fields, "due").is_empty());

        fields.insert("due".to_string(), FieldValue::text("2024-1-5"));
        assert_eq!(parent_messages(&rules, &fields, "due"), vec![DATE_MESSAGE]);
    }

    #[test]
    fn decimal_accepts_fractions_and_rejects_text() {
        let rules = compile(vec![FieldSpec::decimal("weight")], vec![]);
        let mut fields = FieldMap::new();

        fields.insert("weight".to_string(), FieldValue::text("2.5"));
        assert!(parent_messages(&rules, &fields, "weight").is_empty());

        fields.insert("weight".to_string(), FieldValue::number(2.5));
        assert!(parent_messages(&rules, &fields, "weight").is_empty());

        fields.insert("weight".to_string(), FieldValue::text("cheap"));
        assert_eq!(
            parent_messages(&rules, &fields, "weight"),
            vec!["must be a number"]
        );
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let rules = compile(vec![FieldSpec::text("code").with_max_length(3)], vec![]);
        let mut fields = FieldMap::new();
        fields.insert("code".to_string(), FieldValue::text("äöü"));
        assert!(parent_messages(&rules, &fields, "code").is_empty());

        fields.insert("code".to_string(), FieldValue::text("äöüä"));
        assert_eq!(
            parent_messages(&rules, &fields, "code"),
            vec!["must be at most 3 characters"]
        );
    }

    #[test]
    fn pattern_and_one_of_accumulate_on_the_same_field() {
        let rules = compile(
            vec![FieldSpec::text("status")
                .with_pattern("^[a-z]+$")
                .with_one_of(["open", "closed"])],
            vec![],
        );
        let mut fields = FieldMap::new();
        fields.insert("status".to_string(), FieldValue::text("WIP"));
        let messages = parent_messages(&rules, &fields, "status");
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("must match pattern"));
        assert!(messages[1].contains("must be one of"));
    }

    #[test]
    fn lenient_matching_ignores_case_and_padding() {
        let rules = compile(
            vec![FieldSpec::text("status").with_one_of(["Open", "Closed"])],
            vec![],
        );
        let mut fields = FieldMap::new();
        fields.insert("status".to_string(), FieldValue::text(" open "));
        assert!(parent_messages(&rules, &fields, "status").is_empty());

        let mut report = ValidationReport::new();
        let strict = EditorOptions::default().with_value_matching(ValueMatching::Strict);
        rules.check_parent(&fields, &strict, &mut report);
        assert_eq!(report.messages_for(Scope::Parent, "status").len(), 1);
    }
}
