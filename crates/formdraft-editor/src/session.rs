use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use formdraft_model::{
    CommitPayload, DraftId, FieldValue, ParentRecord, RecordId, Scope, ValidationReport,
};

use crate::draft::ParentDraft;
use crate::editor::DraftEditor;
use crate::error::{EditError, SubmitError};
use crate::store::{ParentStore, StoreError};

/// Unsaved-changes state of a session.
///
/// A failed commit keeps the dirty flag: the draft still differs from the
/// store and the user should be offered a retry.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    dirty: bool,
    committing: bool,
    last_change: Option<DateTime<Utc>>,
}

impl ChangeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.last_change = Some(Utc::now());
    }

    pub fn start_commit(&mut self) {
        self.committing = true;
    }

    /// The commit landed; the draft now matches the store.
    pub fn commit_complete(&mut self) {
        self.committing = false;
        self.dirty = false;
    }

    /// The commit did not land; edits are allowed again and the draft is
    /// still dirty.
    pub fn commit_failed(&mut self) {
        self.committing = false;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn is_committing(&self) -> bool {
        self.committing
    }

    #[must_use]
    pub fn last_change(&self) -> Option<DateTime<Utc>> {
        self.last_change
    }
}

/// One discrete edit requested by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    AddChild,
    RemoveChild(DraftId),
    FieldChange {
        scope: Scope,
        field: String,
        value: FieldValue,
    },
}

/// Owns one draft for its whole editing lifetime.
///
/// The session is the narrow owner the UI talks to: it dispatches intents
/// into the editor, tracks unsaved changes, runs validation on demand and
/// drives the commit against a [`ParentStore`]. A successful submit
/// finishes the session; `cancel` consumes it and the draft with it.
#[derive(Debug)]
pub struct EditSession {
    editor: DraftEditor,
    draft: ParentDraft,
    tracker: ChangeTracker,
    finished: bool,
}

impl EditSession {
    /// Session over a brand-new record.
    #[must_use]
    pub fn start_new(editor: DraftEditor) -> Self {
        let draft = editor.new_draft();
        Self {
            editor,
            draft,
            tracker: ChangeTracker::new(),
            finished: false,
        }
    }

    /// Loads a record through the store and opens a session over its
    /// hydrated draft.
    pub fn open<S: ParentStore>(
        editor: DraftEditor,
        store: &S,
        id: RecordId,
    ) -> Result<Self, StoreError> {
        let (parent, children) = store.load(id)?;
        let draft = editor.hydrate(&parent, &children);
        debug!(parent_id = %id, children = draft.child_count(), "edit session opened");
        Ok(Self {
            editor,
            draft,
            tracker: ChangeTracker::new(),
            finished: false,
        })
    }

    fn guard_editable(&self) -> Result<(), EditError> {
        if self.finished {
            return Err(EditError::DraftCommitted);
        }
        if self.tracker.is_committing() {
            return Err(EditError::CommitInFlight);
        }
        Ok(())
    }

    pub fn add_child(&mut self) -> Result<DraftId, EditError> {
        self.guard_editable()?;
        let draft_id = self.editor.add_child(&mut self.draft);
        self.tracker.mark_dirty();
        Ok(draft_id)
    }

    pub fn remove_child(&mut self, draft_id: DraftId) -> Result<bool, EditError> {
        self.guard_editable()?;
        let removed = self.editor.remove_child(&mut self.draft, draft_id);
        if removed {
            self.tracker.mark_dirty();
        }
        Ok(removed)
    }

    pub fn change_field(
        &mut self,
        scope: Scope,
        field: &str,
        value: FieldValue,
    ) -> Result<(), EditError> {
        self.guard_editable()?;
        self.editor
            .apply_field_change(&mut self.draft, scope, field, value)?;
        self.tracker.mark_dirty();
        Ok(())
    }

    /// Dispatches one typed intent. Rejections are contract violations of
    /// the calling layer and are logged as errors before being returned.
    pub fn apply(&mut self, intent: EditIntent) -> Result<(), EditError> {
        let result = match intent {
            EditIntent::AddChild => self.add_child().map(|_| ()),
            EditIntent::RemoveChild(draft_id) => self.remove_child(draft_id).map(|_| ()),
            EditIntent::FieldChange {
                scope,
                field,
                value,
            } => self.change_field(scope, &field, value),
        };
        if let Err(err) = &result {
            error!(error = %err, "edit intent rejected");
        }
        result
    }

    /// On-change validation pass over the current draft.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        self.editor.validate(&self.draft)
    }

    /// Validates and hands back the commit payload, marking the session
    /// commit-in-flight. The caller transports the payload to its store and
    /// settles with [`complete_submit`](Self::complete_submit). Edits are
    /// rejected in between.
    pub fn begin_submit(&mut self) -> Result<CommitPayload, SubmitError> {
        self.guard_editable()?;
        let payload = self
            .editor
            .prepare_commit(&self.draft)
            .map_err(SubmitError::Validation)?;
        self.tracker.start_commit();
        Ok(payload)
    }

    /// Settles an in-flight commit with the store's outcome. Success
    /// finishes the session; failure preserves the draft and its dirty
    /// state for a retry. Settling when no commit is in flight is a
    /// contract violation and changes nothing.
    pub fn complete_submit(
        &mut self,
        outcome: Result<ParentRecord, StoreError>,
    ) -> Result<ParentRecord, SubmitError> {
        if !self.tracker.is_committing() {
            let err = EditError::NoCommitInFlight;
            error!(error = %err, "commit settle rejected");
            return Err(err.into());
        }
        match outcome {
            Ok(parent) => {
                self.tracker.commit_complete();
                self.draft.mark_committed();
                self.finished = true;
                debug!(parent_id = %parent.id, "draft committed");
                Ok(parent)
            }
            Err(err) => {
                self.tracker.commit_failed();
                warn!(error = %err, "commit failed, draft preserved for retry");
                Err(SubmitError::Store(err))
            }
        }
    }

    /// Prepares the payload, commits it against the store and settles, in
    /// one call.
    pub fn submit<S: ParentStore>(&mut self, store: &mut S) -> Result<ParentRecord, SubmitError> {
        let payload = self.begin_submit()?;
        let outcome = store.commit(&payload);
        self.complete_submit(outcome)
    }

    /// Discards the draft. Nothing was written anywhere.
    pub fn cancel(self) {
        debug!("edit session cancelled, draft discarded");
    }

    #[must_use]
    pub fn draft(&self) -> &ParentDraft {
        &self.draft
    }

    #[must_use]
    pub fn editor(&self) -> &DraftEditor {
        &self.editor
    }

    #[must_use]
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_clears_dirty_only_on_successful_commit() {
        let mut tracker = ChangeTracker::new();
        assert!(!tracker.is_dirty());

        tracker.mark_dirty();
        assert!(tracker.is_dirty());
        assert!(tracker.last_change().is_some());

        tracker.start_commit();
        assert!(tracker.is_committing());
        tracker.commit_failed();
        assert!(!tracker.is_committing());
        assert!(tracker.is_dirty());

        tracker.start_commit();
        tracker.commit_complete();
        assert!(!tracker.is_committing());
        assert!(!tracker.is_dirty());
    }
}
