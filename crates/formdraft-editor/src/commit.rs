use formdraft_model::{ChildCommit, CommitPayload, FieldMap, FieldSpec, FieldValue, FormSchema};

use crate::draft::ParentDraft;
use crate::options::EditorOptions;

/// Builds the commit payload for a draft that already passed validation.
///
/// Children come out in draft order: rows with a persisted id as updates,
/// the rest as inserts. Rows the user removed are simply absent; the store
/// treats the list as the complete collection.
pub(crate) fn build_payload(
    schema: &FormSchema,
    options: &EditorOptions,
    draft: &ParentDraft,
) -> CommitPayload {
    CommitPayload {
        parent_id: draft.parent_id(),
        parent_fields: canonical_fields(schema.parent_fields(), draft.fields(), options),
        children: draft
            .children()
            .iter()
            .map(|child| {
                let fields = canonical_fields(schema.child_fields(), child.fields(), options);
                match child.persisted_id() {
                    Some(id) => ChildCommit::update(id, fields),
                    None => ChildCommit::insert(fields),
                }
            })
            .collect(),
    }
}

/// Copies a field map for the payload, canonicalizing numeric text on
/// integer and decimal fields when the option is on. The draft itself is
/// never rewritten.
fn canonical_fields(specs: &[FieldSpec], fields: &FieldMap, options: &EditorOptions) -> FieldMap {
    if !options.coerce_numeric_text {
        return fields.clone();
    }
    fields
        .iter()
        .map(|(name, value)| {
            let spec = specs.iter().find(|spec| spec.name == *name);
            (name.clone(), canonical_value(spec, value))
        })
        .collect()
}

fn canonical_value(spec: Option<&FieldSpec>, value: &FieldValue) -> FieldValue {
    let Some(spec) = spec else {
        return value.clone();
    };
    if !spec.kind.is_numeric() {
        return value.clone();
    }
    match value {
        FieldValue::Text(text) => match text.trim().parse::<f64>() {
            Ok(number) => FieldValue::Number(number),
            // Validation already accepted the value; keep it as typed.
            Err(_) => value.clone(),
        },
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_canonicalized_only_when_enabled() {
        let specs = vec![FieldSpec::integer("priority"), FieldSpec::text("title")];
        let mut fields = FieldMap::new();
        fields.insert("priority".to_string(), FieldValue::text(" 3 "));
        fields.insert("title".to_string(), FieldValue::text("3"));

        let on = canonical_fields(&specs, &fields, &EditorOptions::default());
        assert_eq!(on["priority"], FieldValue::number(3.0));
        assert_eq!(on["title"], FieldValue::text("3"));

        let off = canonical_fields(
            &specs,
            &fields,
            &EditorOptions::default().with_coerce_numeric_text(false),
        );
        assert_eq!(off["priority"], FieldValue::text(" 3 "));
    }
}
