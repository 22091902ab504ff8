//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the criteria model.
/// These are independent of storage and presentation concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown criterion id: {0}")]
    UnknownId(String),

    #[error("duplicate criterion id: {0}")]
    DuplicateId(String),

    #[error("invalid criterion id: {0:?}")]
    InvalidId(String),

    #[error("criterion {0} has children, its score is derived")]
    NotALeaf(String),

    #[error("maturity option {index} out of range for {id} ({len} options)")]
    OptionOutOfRange { id: String, index: usize, len: usize },

    #[error("maturity option {index} of {id} is blank")]
    BlankOption { id: String, index: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
