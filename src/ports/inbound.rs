//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI drives one analysis session.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive flow (pick file, pick participant, enter prompt, stream results).
    async fn run(&self) -> Result<(), DomainError>;
}
