//! Mock AI adapter for testing without API calls.
//!
//! Returns canned summaries, with configurable latency and failures.

use crate::domain::{DomainError, SummaryRequest};
use crate::ports::AiPort;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Mock AI adapter.
///
/// A request whose user prompt contains a configured marker fails, or waits for the
/// marker's delay instead of the default. Tracks peak in-flight calls so tests can
/// check the dispatcher's concurrency bound.
pub struct MockAiAdapter {
    /// Simulated network delay.
    delay: Duration,
    fail_markers: Vec<String>,
    delay_overrides: Vec<(String, Duration)>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self::with_delay(100)
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            fail_markers: Vec::new(),
            delay_overrides: Vec::new(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every request whose user prompt contains `marker`.
    pub fn fail_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_markers.push(marker.into());
        self
    }

    /// Use `delay_ms` for requests whose user prompt contains `marker`.
    pub fn delay_on(mut self, marker: impl Into<String>, delay_ms: u64) -> Self {
        self.delay_overrides
            .push((marker.into(), Duration::from_millis(delay_ms)));
        self
    }

    /// Highest number of concurrent `summarize` calls observed.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Total number of `summarize` calls started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn delay_for(&self, prompt: &str) -> Duration {
        self.delay_overrides
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, d)| *d)
            .unwrap_or(self.delay)
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter even when the call future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        info!(
            prompt_len = request.user_prompt.len(),
            "[MOCK] Simulating AI summarization"
        );

        tokio::time::sleep(self.delay_for(&request.user_prompt)).await;

        if let Some(marker) = self
            .fail_markers
            .iter()
            .find(|m| request.user_prompt.contains(m.as_str()))
        {
            return Err(DomainError::Ai(format!("[MOCK] simulated failure for {}", marker)));
        }

        let line_count = request
            .user_prompt
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count();
        Ok(format!(
            "[MOCK] Summary of a {}-line excerpt. In production, the LLM would describe \
             what the participant said and how the conversation around it developed.",
            line_count
        ))
    }
}
