//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, SummaryRequest};

/// Text-analysis service. One request in, one summary string out.
///
/// Implementations are shared across concurrent dispatch tasks, so they must be
/// `Send + Sync` and hold only read-only state (credentials, endpoint, model).
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Summarize a rendered conversation excerpt.
    ///
    /// # Errors
    /// Returns `DomainError::Ai` on transport failure, non-success status, or a
    /// response without usable content.
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, DomainError>;
}
