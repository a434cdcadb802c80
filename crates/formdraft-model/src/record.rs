use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::value::FieldMap;

/// A parent record as loaded from the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRecord {
    pub id: RecordId,
    pub fields: FieldMap,
}

impl ParentRecord {
    pub fn new(id: RecordId, fields: FieldMap) -> Self {
        Self { id, fields }
    }
}

/// A child row as loaded from the backing store, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub id: RecordId,
    pub fields: FieldMap,
}

impl ChildRecord {
    pub fn new(id: RecordId, fields: FieldMap) -> Self {
        Self { id, fields }
    }
}
