//! Property tests for draft-id allocation and report scope recomputation
//! under arbitrary add/remove sequences.

use std::collections::BTreeSet;

use proptest::prelude::*;

use formdraft_editor::DraftEditor;
use formdraft_model::{FieldSpec, FormSchema, Scope};

#[derive(Debug, Clone)]
enum Op {
    Add,
    /// Remove the n-th live row (modulo the current count).
    RemoveNth(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Add),
        1 => any::<usize>().prop_map(Op::RemoveNth),
    ]
}

fn editor() -> DraftEditor {
    let schema = FormSchema::new(vec![], vec![FieldSpec::text("code").required()])
        .expect("schema");
    DraftEditor::new(schema).expect("editor")
}

proptest! {
    #[test]
    fn draft_ids_stay_unique_and_are_never_reused(
        ops in prop::collection::vec(op_strategy(), 0..64)
    ) {
        let editor = editor();
        let mut draft = editor.new_draft();
        let mut ever_issued = BTreeSet::new();

        for op in ops {
            match op {
                Op::Add => {
                    let id = editor.add_child(&mut draft);
                    prop_assert!(ever_issued.insert(id), "id {id} was issued twice");
                }
                Op::RemoveNth(raw) => {
                    if draft.child_count() == 0 {
                        continue;
                    }
                    let index = raw % draft.child_count();
                    let id = draft.children()[index].draft_id();
                    prop_assert!(editor.remove_child(&mut draft, id));
                }
            }
            let live: BTreeSet<_> = draft
                .children()
                .iter()
                .map(|child| child.draft_id())
                .collect();
            prop_assert_eq!(live.len(), draft.child_count());
        }
    }

    #[test]
    fn report_scopes_always_mirror_the_live_rows(
        ops in prop::collection::vec(op_strategy(), 0..64)
    ) {
        let editor = editor();
        let mut draft = editor.new_draft();

        for op in ops {
            match op {
                Op::Add => {
                    editor.add_child(&mut draft);
                }
                Op::RemoveNth(raw) => {
                    if draft.child_count() == 0 {
                        continue;
                    }
                    let index = raw % draft.child_count();
                    let id = draft.children()[index].draft_id();
                    editor.remove_child(&mut draft, id);
                }
            }
        }

        // Every live row is blank on a required field, so each must appear
        // in the report, and nothing else may.
        let report = editor.validate(&draft);
        let reported: BTreeSet<_> = report.scopes().collect();
        let live: BTreeSet<_> = draft
            .children()
            .iter()
            .map(|child| Scope::Child(child.draft_id()))
            .collect();
        prop_assert_eq!(reported, live);
    }
}
