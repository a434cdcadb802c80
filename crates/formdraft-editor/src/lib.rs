//! Draft-based editing of a parent record and its child-row collection.
//!
//! A [`DraftEditor`] is built once over a declared
//! [`FormSchema`](formdraft_model::FormSchema) and applies discrete edits to
//! [`ParentDraft`]s: rows are added and removed, fields change, validation
//! produces a per-scope report, and a clean draft turns into an atomic
//! commit payload whose child list fully replaces the stored collection.
//! An [`EditSession`] wraps one draft's lifetime for a UI layer, from open
//! or start-new through submit or cancel.
//!
//! ```
//! use formdraft_editor::{DraftEditor, EditSession, MemoryStore};
//! use formdraft_model::{FieldSpec, FieldValue, FormSchema, Scope};
//!
//! let schema = FormSchema::new(
//!     vec![FieldSpec::text("title").required()],
//!     vec![FieldSpec::text("code").required()],
//! )?;
//! let editor = DraftEditor::new(schema)?;
//! let mut session = EditSession::start_new(editor);
//!
//! session.change_field(Scope::Parent, "title", FieldValue::text("Launch plan"))?;
//! let row = session.add_child()?;
//! session.change_field(Scope::Child(row), "code", FieldValue::text("LP-1"))?;
//!
//! let mut store = MemoryStore::new();
//! let saved = session.submit(&mut store)?;
//! assert!(store.contains(saved.id));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod draft;
pub mod editor;
pub mod error;
pub mod options;
pub mod session;
pub mod store;

mod commit;
mod rules;

pub use draft::{ChildDraft, ParentDraft};
pub use editor::DraftEditor;
pub use error::{EditError, SubmitError};
pub use options::{EditorOptions, ValueMatching};
pub use session::{ChangeTracker, EditIntent, EditSession};
pub use store::{MemoryStore, ParentStore, StoreError};
