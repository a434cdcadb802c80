use formdraft_model::{
    ChildRecord, CommitPayload, DraftId, FieldMap, FieldValue, FormSchema, ParentRecord,
    SchemaError, Scope, ValidationReport,
};
use tracing::{debug, warn};

use crate::commit;
use crate::draft::ParentDraft;
use crate::error::EditError;
use crate::options::EditorOptions;
use crate::rules::RuleSet;

/// Applies edits to [`ParentDraft`]s and validates them against one
/// declared schema.
///
/// The editor holds no draft state itself; it is cheap to share across
/// drafts of the same form. All schema-derived work (including regex
/// compilation) happens once in the constructor, so a successfully built
/// editor cannot fail later for schema reasons.
#[derive(Debug)]
pub struct DraftEditor {
    schema: FormSchema,
    rules: RuleSet,
    options: EditorOptions,
}

impl DraftEditor {
    pub fn new(schema: FormSchema) -> Result<Self, SchemaError> {
        Self::with_options(schema, EditorOptions::default())
    }

    pub fn with_options(schema: FormSchema, options: EditorOptions) -> Result<Self, SchemaError> {
        let rules = RuleSet::compile(&schema)?;
        Ok(Self {
            schema,
            rules,
            options,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// A draft for a record that does not exist yet: every declared parent
    /// field at its default, no children, no persisted identity.
    #[must_use]
    pub fn new_draft(&self) -> ParentDraft {
        ParentDraft::new(None, self.schema.default_parent_fields())
    }

    /// Builds a draft from a stored record and its child rows.
    ///
    /// Each child gets a fresh draft id in input order; persisted ids are
    /// carried along untouched. Declared fields missing from a stored row
    /// are filled with their defaults, and stored fields the schema does
    /// not declare are dropped (with a warning). The draft holds owned
    /// copies only.
    #[must_use]
    pub fn hydrate(&self, parent: &ParentRecord, children: &[ChildRecord]) -> ParentDraft {
        let fields = overlay(self.schema.default_parent_fields(), &parent.fields);
        let mut draft = ParentDraft::new(Some(parent.id), fields);
        for child in children {
            let fields = overlay(self.schema.default_child_fields(), &child.fields);
            let draft_id = draft.insert_child(Some(child.id), fields);
            debug!(draft_id = %draft_id, persisted_id = %child.id, "child row hydrated");
        }
        draft
    }

    /// Appends a blank child row and returns its draft id, which is the
    /// caller's key for addressing the row from now on. No other row is
    /// touched.
    pub fn add_child(&self, draft: &mut ParentDraft) -> DraftId {
        let draft_id = draft.insert_child(None, self.schema.default_child_fields());
        debug!(draft_id = %draft_id, "child row added");
        draft_id
    }

    /// Removes the row with the given draft id, preserving the order of the
    /// rest. Unknown ids are tolerated as a no-op (duplicate or late UI
    /// events) and reported back as `false`.
    pub fn remove_child(&self, draft: &mut ParentDraft, draft_id: DraftId) -> bool {
        if draft.delete_child(draft_id) {
            debug!(draft_id = %draft_id, "child row removed");
            true
        } else {
            warn!(draft_id = %draft_id, "remove for unknown child row ignored");
            false
        }
    }

    /// Sets one field in one scope. The draft is untouched when the scope
    /// names a removed or never-existing row (`ScopeNotFound`) or the field
    /// is not declared for that scope (`UnknownField`).
    pub fn apply_field_change(
        &self,
        draft: &mut ParentDraft,
        scope: Scope,
        field: &str,
        value: FieldValue,
    ) -> Result<(), EditError> {
        match scope {
            Scope::Parent => {
                if self.schema.parent_field(field).is_none() {
                    return Err(EditError::UnknownField {
                        scope,
                        field: field.to_string(),
                    });
                }
                draft.fields_mut().insert(field.to_string(), value);
            }
            Scope::Child(draft_id) => {
                let Some(child) = draft.child_mut(draft_id) else {
                    return Err(EditError::ScopeNotFound { scope });
                };
                if self.schema.child_field(field).is_none() {
                    return Err(EditError::UnknownField {
                        scope,
                        field: field.to_string(),
                    });
                }
                child.fields_mut().insert(field.to_string(), value);
            }
        }
        Ok(())
    }

    /// Runs every compiled rule against the current draft and returns a
    /// fresh report. Child scopes are recomputed from the draft's current
    /// rows on every pass, never carried over from an earlier report, so
    /// findings against removed rows cannot survive.
    #[must_use]
    pub fn validate(&self, draft: &ParentDraft) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.rules
            .check_parent(draft.fields(), &self.options, &mut report);
        for child in draft.children() {
            self.rules.check_child(
                Scope::Child(child.draft_id()),
                child.fields(),
                &self.options,
                &mut report,
            );
        }
        self.rules.check_unique_children(
            draft
                .children()
                .iter()
                .map(|child| (child.draft_id(), child.fields())),
            &mut report,
        );
        debug!(findings = report.error_count(), "draft validated");
        report
    }

    /// Validates and, only on a clean report, builds the atomic commit
    /// payload: parent fields plus the full replacement set of children in
    /// draft order. A dirty report is returned as data; the draft is not
    /// altered either way.
    pub fn prepare_commit(&self, draft: &ParentDraft) -> Result<CommitPayload, ValidationReport> {
        let report = self.validate(draft);
        if !report.is_empty() {
            debug!(findings = report.error_count(), "commit blocked by validation");
            return Err(report);
        }
        let payload = commit::build_payload(&self.schema, &self.options, draft);
        debug!(
            updates = payload.update_count(),
            inserts = payload.insert_count(),
            "commit payload prepared"
        );
        Ok(payload)
    }
}

/// Declared defaults overlaid with the stored values for declared fields.
fn overlay(defaults: FieldMap, stored: &FieldMap) -> FieldMap {
    let mut fields = defaults;
    for (name, value) in stored {
        if fields.contains_key(name) {
            fields.insert(name.clone(), value.clone());
        } else {
            warn!(field = %name, "undeclared field in stored record dropped from draft");
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdraft_model::{FieldSpec, RecordId};

    fn editor() -> DraftEditor {
        let schema = FormSchema::new(
            vec![
                FieldSpec::text("title").required(),
                FieldSpec::text("notes"),
            ],
            vec![FieldSpec::text("code").required()],
        )
        .expect("schema");
        DraftEditor::new(schema).expect("editor")
    }

    #[test]
    fn hydration_fills_defaults_and_drops_undeclared_fields() {
        let editor = editor();
        let mut stored = FieldMap::new();
        stored.insert("title".to_string(), FieldValue::text("Plan"));
        stored.insert("legacy".to_string(), FieldValue::text("gone"));
        let parent = ParentRecord::new(RecordId::new(1), stored);

        let draft = editor.hydrate(&parent, &[]);
        assert_eq!(draft.fields().len(), 2);
        assert_eq!(draft.fields()["title"], FieldValue::text("Plan"));
        assert_eq!(draft.fields()["notes"], FieldValue::Empty);
        assert!(!draft.fields().contains_key("legacy"));
        assert_eq!(draft.parent_id(), Some(RecordId::new(1)));
    }

    #[test]
    fn hydrated_draft_is_decoupled_from_its_source() {
        let editor = editor();
        let mut stored = FieldMap::new();
        stored.insert("code".to_string(), FieldValue::text("A1"));
        let parent = ParentRecord::new(RecordId::new(1), FieldMap::new());
        let children = vec![ChildRecord::new(RecordId::new(10), stored)];

        let mut draft = editor.hydrate(&parent, &children);
        let draft_id = draft.children()[0].draft_id();
        editor
            .apply_field_change(
                &mut draft,
                Scope::Child(draft_id),
                "code",
                FieldValue::text("B2"),
            )
            .expect("change applies");

        assert_eq!(children[0].fields["code"], FieldValue::text("A1"));
        assert_eq!(draft.children()[0].fields()["code"], FieldValue::text("B2"));
    }
}
