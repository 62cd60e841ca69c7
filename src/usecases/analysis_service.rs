//! Analysis service. Orchestrates the participant-summary workflow.
//!
//! Coordinates between the transcript loader (data), window extractor, and the
//! dispatcher (AI calls). Results stream back through the run's conduit.

use super::conduit::ResultConduit;
use super::dispatcher::AnalysisDispatcher;
use super::participants::distinct_authors;
use super::window::{DEFAULT_RADIUS, windows};
use crate::adapters::transcript::load_path;
use crate::domain::DomainError;
use crate::ports::AiPort;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What the caller asks for. All three fields are required.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub path: PathBuf,
    pub target_author: String,
    pub prompt_template: String,
}

impl AnalysisRequest {
    /// Reject empty path, author, or prompt before any work starts.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.path.as_os_str().is_empty() {
            return Err(DomainError::InvalidSelection(
                "no transcript file selected".to_string(),
            ));
        }
        if self.target_author.trim().is_empty() {
            return Err(DomainError::InvalidSelection(
                "no participant selected".to_string(),
            ));
        }
        if self.prompt_template.trim().is_empty() {
            return Err(DomainError::InvalidSelection(
                "prompt template is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A started run. Owns the conduit; dropping it discards undelivered results.
#[derive(Debug)]
pub struct AnalysisRun {
    pub units_submitted: usize,
    pub rows_skipped: usize,
    pub conduit: ResultConduit,
}

/// Service for AI-powered participant analysis.
///
/// Orchestrates the flow:
/// 1. Validate the submission
/// 2. Load the transcript (bad rows are skipped)
/// 3. Extract one context window per message by the target author
/// 4. Dispatch windows to the AI port, streaming results into a conduit
pub struct AnalysisService {
    dispatcher: AnalysisDispatcher,
    radius: usize,
}

impl AnalysisService {
    /// Create a new analysis service.
    ///
    /// # Arguments
    /// * `ai` - AI port implementation (OpenAI, Mock, etc.)
    /// * `max_concurrency` - Upper bound on in-flight service calls
    /// * `call_timeout` - Upper bound on a single service call
    pub fn new(ai: Arc<dyn AiPort>, max_concurrency: usize, call_timeout: Duration) -> Self {
        Self {
            dispatcher: AnalysisDispatcher::new(ai, max_concurrency, call_timeout),
            radius: DEFAULT_RADIUS,
        }
    }

    /// Participants found in a transcript file, sorted.
    pub fn participants(&self, path: &std::path::Path) -> Result<BTreeSet<String>, DomainError> {
        let report = load_path(path)?;
        Ok(distinct_authors(&report.transcript))
    }

    /// Start a run. Returns as soon as every unit is queued for dispatch.
    ///
    /// A target author with no messages yields a run with zero units whose conduit is
    /// already finished.
    pub fn start(
        &self,
        request: &AnalysisRequest,
        cancel: CancellationToken,
    ) -> Result<AnalysisRun, DomainError> {
        request.validate()?;

        let report = load_path(&request.path)?;
        let units = windows(&report.transcript, &request.target_author, self.radius);

        if units.is_empty() {
            warn!(author = %request.target_author, "participant has no messages in transcript");
        }
        info!(
            author = %request.target_author,
            messages = report.transcript.len(),
            units = units.len(),
            skipped_rows = report.skipped.len(),
            "starting analysis run"
        );

        let units_submitted = units.len();
        let conduit = self
            .dispatcher
            .dispatch(units, &request.prompt_template, cancel);

        Ok(AnalysisRun {
            units_submitted,
            rows_skipped: report.skipped.len(),
            conduit,
        })
    }
}
