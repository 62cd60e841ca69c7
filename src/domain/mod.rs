//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    AnalysisUnit, Message, SummaryRequest, SummaryResult, TIMESTAMP_DISPLAY_FORMAT, Transcript,
};
pub use errors::{DomainError, RowParseError, SummaryError};
