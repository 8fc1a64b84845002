use symex_smt_smtlib::SymbolConflict;
use symex_smt_smtlib::sort::Sort;
use thiserror::Error;

/// Errors raised while translating expressions or building queries.
///
/// Every error aborts the current pass before any script text is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No translation exists for the requested operation.
    #[error("unsupported operation: {op}")]
    UnsupportedOperation { op: String },

    /// A leaf payload does not match what the operation expects.
    #[error("malformed literal for {op}: {reason}")]
    MalformedLiteral { op: String, reason: String },

    /// An operation received the wrong number of arguments.
    #[error("{op} expects {expected} argument(s), got {found}")]
    Arity {
        op: String,
        expected: String,
        found: usize,
    },

    /// A symbol name was reused with a different sort.
    #[error("symbol `{name}` declared as {declared}, used as {requested}")]
    SortConflict {
        name: String,
        declared: Sort,
        requested: Sort,
    },

    /// This backend cannot decide satisfiability itself.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Configuration could not be parsed or is invalid.
    #[error("invalid backend configuration: {0}")]
    InvalidConfig(String),
}

impl BackendError {
    pub(crate) fn unsupported(op: impl Into<String>) -> Self {
        BackendError::UnsupportedOperation { op: op.into() }
    }

    pub(crate) fn malformed(op: impl Into<String>, reason: impl Into<String>) -> Self {
        BackendError::MalformedLiteral {
            op: op.into(),
            reason: reason.into(),
        }
    }
}

impl From<SymbolConflict> for BackendError {
    fn from(err: SymbolConflict) -> Self {
        BackendError::SortConflict {
            name: err.name,
            declared: err.first,
            requested: err.second,
        }
    }
}
