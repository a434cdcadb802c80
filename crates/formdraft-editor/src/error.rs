use thiserror::Error;

use formdraft_model::{Scope, ValidationReport};

use crate::store::StoreError;

/// Contract violations by the calling layer. These indicate a UI bug (an
/// event against a row that no longer exists, an undeclared field, edits
/// after the session concluded), never bad user input; user input problems
/// surface as a [`ValidationReport`].
#[derive(Debug, Error)]
pub enum EditError {
    #[error("scope {scope} does not exist in this draft")]
    ScopeNotFound { scope: Scope },
    #[error("field `{field}` is not declared for {scope}")]
    UnknownField { scope: Scope, field: String },
    #[error("draft was already committed")]
    DraftCommitted,
    #[error("a commit is in flight; edits are rejected until it settles")]
    CommitInFlight,
    #[error("no commit is in flight to settle")]
    NoCommitInFlight,
}

/// Why a submit did not conclude the session.
///
/// `Validation` carries the full report back as data for per-field display;
/// `Store` wraps the collaborator's failure unchanged. In both cases the
/// draft survives untouched so the user can correct or retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("draft failed validation with {} finding(s)", .0.error_count())]
    Validation(ValidationReport),
    #[error("store rejected the commit")]
    Store(#[source] StoreError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
