use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use formdraft_model::{ChildRecord, CommitPayload, FieldMap, ParentRecord, RecordId};

/// Failure from the persistence collaborator.
///
/// `Backend` wraps whatever the underlying store produced, unchanged; the
/// editor never interprets it, only hands it back so the UI can offer a
/// retry against the preserved draft.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {id} not found")]
    NotFound { id: RecordId },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        StoreError::Backend(err.into())
    }
}

/// The persistence seam a draft session talks to.
///
/// `load` returns a parent and its child rows in collection order, eagerly.
/// `commit` applies a payload atomically: parent upsert plus replacement of
/// the entire child collection. Implementations decide how "atomic" is
/// achieved; they must not apply a payload partially.
pub trait ParentStore {
    fn load(&self, id: RecordId) -> Result<(ParentRecord, Vec<ChildRecord>), StoreError>;

    fn commit(&mut self, payload: &CommitPayload) -> Result<ParentRecord, StoreError>;
}

#[derive(Debug)]
struct StoredParent {
    fields: FieldMap,
    children: Vec<(RecordId, FieldMap)>,
}

/// In-memory [`ParentStore`], the reference implementation of the commit
/// contract and the backing for the integration tests.
///
/// Reconciliation works off the replacement set alone: payload rows with a
/// persisted id overwrite that row, rows without one are inserted with a
/// fresh id, and persisted rows absent from the payload are deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    parents: BTreeMap<RecordId, StoredParent>,
    next_id: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parent with child rows directly, bypassing the commit
    /// path. Test setup helper.
    pub fn seed(&mut self, parent_fields: FieldMap, children: Vec<FieldMap>) -> RecordId {
        let parent_id = self.next_record_id();
        let children = children
            .into_iter()
            .map(|fields| (self.next_record_id(), fields))
            .collect();
        self.parents.insert(
            parent_id,
            StoredParent {
                fields: parent_fields,
                children,
            },
        );
        parent_id
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.parents.contains_key(&id)
    }

    fn next_record_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::new(self.next_id)
    }
}

impl ParentStore for MemoryStore {
    fn load(&self, id: RecordId) -> Result<(ParentRecord, Vec<ChildRecord>), StoreError> {
        let stored = self.parents.get(&id).ok_or(StoreError::NotFound { id })?;
        let children = stored
            .children
            .iter()
            .map(|(child_id, fields)| ChildRecord::new(*child_id, fields.clone()))
            .collect();
        Ok((ParentRecord::new(id, stored.fields.clone()), children))
    }

    fn commit(&mut self, payload: &CommitPayload) -> Result<ParentRecord, StoreError> {
        // Resolve every identity before touching stored state, so a failed
        // commit leaves the store exactly as it was.
        let parent_id = match payload.parent_id {
            Some(id) => {
                if !self.parents.contains_key(&id) {
                    return Err(StoreError::NotFound { id });
                }
                id
            }
            None => self.next_record_id(),
        };

        let mut remaining: BTreeSet<RecordId> = payload
            .parent_id
            .and_then(|id| self.parents.get(&id))
            .map(|stored| stored.children.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default();

        let mut children = Vec::with_capacity(payload.children.len());
        for child in &payload.children {
            let child_id = match child.persisted_id {
                // `remove` also rejects the same row being updated twice.
                Some(id) => {
                    if !remaining.remove(&id) {
                        return Err(StoreError::NotFound { id });
                    }
                    id
                }
                None => self.next_record_id(),
            };
            children.push((child_id, child.fields.clone()));
        }

        let deleted = remaining.len();
        self.parents.insert(
            parent_id,
            StoredParent {
                fields: payload.parent_fields.clone(),
                children,
            },
        );
        debug!(
            parent_id = %parent_id,
            children = payload.children.len(),
            deleted,
            "commit applied"
        );
        Ok(ParentRecord::new(parent_id, payload.parent_fields.clone()))
    }
}
