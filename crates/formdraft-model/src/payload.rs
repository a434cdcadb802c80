use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::value::FieldMap;

/// One child row of a commit: an update of a persisted row, or an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildCommit {
    /// Present on updates; absent (and not serialized) on inserts, where
    /// the store assigns identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted_id: Option<RecordId>,
    pub fields: FieldMap,
}

impl ChildCommit {
    pub fn update(persisted_id: RecordId, fields: FieldMap) -> Self {
        Self {
            persisted_id: Some(persisted_id),
            fields,
        }
    }

    pub fn insert(fields: FieldMap) -> Self {
        Self {
            persisted_id: None,
            fields,
        }
    }

    #[must_use]
    pub fn is_update(&self) -> bool {
        self.persisted_id.is_some()
    }

    #[must_use]
    pub fn is_insert(&self) -> bool {
        self.persisted_id.is_none()
    }
}

/// Everything a commit applies, atomically.
///
/// `children` is the full replacement set for the child collection: always
/// present on the wire, possibly empty, in draft order. A persisted child
/// absent from it is deleted by the store; the payload never carries
/// explicit deletions and never carries draft ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitPayload {
    /// Absent when committing a brand-new parent; the store assigns the id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RecordId>,
    pub parent_fields: FieldMap,
    pub children: Vec<ChildCommit>,
}

impl CommitPayload {
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.children.iter().filter(|child| child.is_update()).count()
    }

    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.children.iter().filter(|child| child.is_insert()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn empty_child_list_stays_on_the_wire() {
        let payload = CommitPayload {
            parent_id: Some(RecordId::new(7)),
            parent_fields: FieldMap::new(),
            children: vec![],
        };
        let json = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(json["children"], serde_json::json!([]));
        assert_eq!(json["parent_id"], serde_json::json!(7));
    }

    #[test]
    fn inserts_carry_no_persisted_id_key() {
        let mut fields = FieldMap::new();
        fields.insert("code".to_string(), FieldValue::text("A1"));
        let insert = ChildCommit::insert(fields.clone());
        let update = ChildCommit::update(RecordId::new(3), fields);

        let insert_json = serde_json::to_value(&insert).expect("serialize insert");
        let update_json = serde_json::to_value(&update).expect("serialize update");
        assert!(insert_json.get("persisted_id").is_none());
        assert_eq!(update_json["persisted_id"], serde_json::json!(3));
        assert!(insert.is_insert() && !insert.is_update());
        assert!(update.is_update() && !update.is_insert());
    }
}
