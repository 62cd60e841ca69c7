//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("I/O error: {0}")]
    Io(String),

    /// No API key available. Fatal to anything that needs the dispatcher.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Submission rejected before any work started.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("AI analysis failed: {0}")]
    Ai(String),

    #[error("Input error: {0}")]
    Input(String),
}

/// Per-row loader failure. The row is skipped, the batch continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowParseError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("unsupported timestamp format: {0:?}")]
    Timestamp(String),

    #[error("malformed row: {0}")]
    Malformed(String),
}

/// Failure carried inside a `SummaryResult`. Never escalates to the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("service call failed: {0}")]
    ServiceCallFailed(String),

    #[error("cancelled before dispatch")]
    Cancelled,
}
