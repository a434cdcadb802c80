pub mod error;
pub mod ids;
pub mod payload;
pub mod record;
pub mod report;
pub mod schema;
pub mod value;

pub use error::SchemaError;
pub use ids::{DraftId, DraftIdAllocator, RecordId};
pub use payload::{ChildCommit, CommitPayload};
pub use record::{ChildRecord, ParentRecord};
pub use report::{FieldErrors, Scope, ValidationReport};
pub use schema::{FieldKind, FieldSpec, FormSchema};
pub use value::{FieldMap, FieldValue};
