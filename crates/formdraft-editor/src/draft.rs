use formdraft_model::{DraftId, DraftIdAllocator, FieldMap, RecordId};

/// One editable child row.
///
/// The draft id is the row's only identity while editing; it is assigned by
/// the owning draft and survives any number of field changes. The persisted
/// id is carried along untouched so a commit can address the stored row.
#[derive(Debug, Clone)]
pub struct ChildDraft {
    draft_id: DraftId,
    persisted_id: Option<RecordId>,
    fields: FieldMap,
}

impl ChildDraft {
    #[must_use]
    pub fn draft_id(&self) -> DraftId {
        self.draft_id
    }

    #[must_use]
    pub fn persisted_id(&self) -> Option<RecordId> {
        self.persisted_id
    }

    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }
}

/// The editable state of one parent record and its child collection.
///
/// A draft is fully decoupled from whatever record it was hydrated from:
/// edits touch nothing outside it until a commit payload is built. Child
/// rows keep their relative order; removal deletes a row outright, and its
/// draft id is never handed out again by this draft.
#[derive(Debug, Clone)]
pub struct ParentDraft {
    parent_id: Option<RecordId>,
    fields: FieldMap,
    children: Vec<ChildDraft>,
    committed: bool,
    ids: DraftIdAllocator,
}

impl ParentDraft {
    pub(crate) fn new(parent_id: Option<RecordId>, fields: FieldMap) -> Self {
        Self {
            parent_id,
            fields,
            children: Vec::new(),
            committed: false,
            ids: DraftIdAllocator::new(),
        }
    }

    /// Appends a row with a freshly allocated draft id and returns the id.
    pub(crate) fn insert_child(
        &mut self,
        persisted_id: Option<RecordId>,
        fields: FieldMap,
    ) -> DraftId {
        let draft_id = self.ids.allocate();
        self.children.push(ChildDraft {
            draft_id,
            persisted_id,
            fields,
        });
        draft_id
    }

    /// Deletes the matching row, keeping the order of the rest. Returns
    /// whether a row was actually removed.
    pub(crate) fn delete_child(&mut self, draft_id: DraftId) -> bool {
        let before = self.children.len();
        self.children.retain(|child| child.draft_id != draft_id);
        self.children.len() != before
    }

    pub(crate) fn child_mut(&mut self, draft_id: DraftId) -> Option<&mut ChildDraft> {
        self.children
            .iter_mut()
            .find(|child| child.draft_id == draft_id)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<RecordId> {
        self.parent_id
    }

    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    #[must_use]
    pub fn children(&self) -> &[ChildDraft] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, draft_id: DraftId) -> Option<&ChildDraft> {
        self.children
            .iter()
            .find(|child| child.draft_id == draft_id)
    }

    #[must_use]
    pub fn has_child(&self, draft_id: DraftId) -> bool {
        self.child(draft_id).is_some()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True once a commit of this draft has succeeded; the draft is then
    /// read-only history, not an editing surface.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}
