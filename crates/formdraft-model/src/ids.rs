use std::fmt;

/// A draft-local row identifier.
///
/// Assigned by a [`DraftIdAllocator`] when a row enters a draft and never
/// reused within that draft, even after the row is removed. Draft ids exist
/// only for the lifetime of an editing session: they are never derived from
/// persisted identity and never appear in a commit payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct DraftId(pub(crate) u64);

impl DraftId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out [`DraftId`]s in strictly increasing order.
///
/// Each draft owns one allocator, which is the only way to mint a draft id.
/// Ids removed from the draft are not returned to the allocator.
#[derive(Debug, Clone)]
pub struct DraftIdAllocator {
    next: u64,
}

impl DraftIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> DraftId {
        let id = DraftId(self.next);
        self.next += 1;
        id
    }
}

impl Default for DraftIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted identity of a record, owned by the backing store.
///
/// Present only on rows that existed before editing began; new rows gain one
/// when the store commits them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
