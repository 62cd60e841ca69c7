//! Analysis dispatcher: fans analysis units out to the AI port, fans results into a conduit.
//!
//! At most `max_concurrency` calls are in flight (semaphore permits are taken before
//! spawning). Every unit yields exactly one `SummaryResult`, success or failure.

use super::conduit::ResultConduit;
use crate::domain::{AnalysisUnit, SummaryError, SummaryRequest, SummaryResult};
use crate::ports::AiPort;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of concurrent service calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Fixed persona sent as the system instruction with every request.
pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert at analyzing conversations in depth and summarizing them.";

/// Build the request for one unit: template, blank line, then the rendered context.
pub fn build_request(prompt_template: &str, unit: &AnalysisUnit) -> SummaryRequest {
    SummaryRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_prompt: format!("{}\n\n{}", prompt_template, unit.render_context()),
    }
}

/// Dispatcher. Shares one AI port across all worker tasks.
pub struct AnalysisDispatcher {
    ai: Arc<dyn AiPort>,
    max_concurrency: usize,
    call_timeout: Duration,
}

impl AnalysisDispatcher {
    pub fn new(ai: Arc<dyn AiPort>, max_concurrency: usize, call_timeout: Duration) -> Self {
        Self {
            ai,
            max_concurrency: max_concurrency.max(1),
            call_timeout,
        }
    }

    /// Submit every unit and return the conduit results will stream into.
    ///
    /// Must be called from within a tokio runtime. Returns immediately; the first result
    /// is available as soon as the first call finishes. Once `cancel` fires, units not yet
    /// dispatched resolve to `SummaryError::Cancelled`; calls already in flight complete.
    pub fn dispatch(
        &self,
        units: Vec<AnalysisUnit>,
        prompt_template: &str,
        cancel: CancellationToken,
    ) -> ResultConduit {
        let (tx, rx) = mpsc::unbounded_channel();
        let conduit = ResultConduit::new(rx, units.len());

        info!(
            units = units.len(),
            max_concurrency = self.max_concurrency,
            "dispatching analysis units"
        );

        let ai = Arc::clone(&self.ai);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let template = prompt_template.to_string();
        let call_timeout = self.call_timeout;

        tokio::spawn(async move {
            let mut cancelled = 0usize;

            for unit in units {
                let anchor = unit.anchor.timestamp;
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
                };
                let Some(permit) = permit else {
                    cancelled += 1;
                    let _ = tx.send(SummaryResult::failure(anchor, SummaryError::Cancelled));
                    continue;
                };

                let request = build_request(&template, &unit);
                let ai = Arc::clone(&ai);
                let tx = tx.clone();

                // The call runs in its own task so a panicking adapter still yields a result.
                tokio::spawn(async move {
                    let _permit = permit;
                    let call = tokio::spawn(async move {
                        Self::call_one(&*ai, &request, call_timeout, anchor).await
                    });
                    let result = match call.await {
                        Ok(result) => result,
                        Err(e) => Self::worker_failure(anchor, e),
                    };
                    if tx.send(result).is_err() {
                        debug!(anchor = %anchor, "conduit dropped; result discarded");
                    }
                });
            }

            if cancelled > 0 {
                info!(cancelled, "run cancelled; remaining units not dispatched");
            } else {
                debug!("all units dispatched");
            }
        });

        conduit
    }

    async fn call_one(
        ai: &dyn AiPort,
        request: &SummaryRequest,
        call_timeout: Duration,
        anchor: chrono::NaiveDateTime,
    ) -> SummaryResult {
        match tokio::time::timeout(call_timeout, ai.summarize(request)).await {
            Ok(Ok(text)) => {
                debug!(anchor = %anchor, summary_len = text.len(), "unit summarized");
                SummaryResult::success(anchor, text)
            }
            Ok(Err(e)) => {
                warn!(anchor = %anchor, error = %e, "service call failed");
                SummaryResult::failure(anchor, SummaryError::ServiceCallFailed(e.to_string()))
            }
            Err(_) => {
                warn!(
                    anchor = %anchor,
                    timeout_secs = call_timeout.as_secs(),
                    "service call timed out"
                );
                let detail = format!("timed out after {}s", call_timeout.as_secs_f32());
                SummaryResult::failure(anchor, SummaryError::ServiceCallFailed(detail))
            }
        }
    }

    fn worker_failure(anchor: chrono::NaiveDateTime, e: JoinError) -> SummaryResult {
        warn!(anchor = %anchor, error = %e, "analysis worker aborted");
        SummaryResult::failure(
            anchor,
            SummaryError::ServiceCallFailed(format!("worker panicked: {}", e)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiAdapter;
    use crate::domain::{DomainError, Message};
    use chrono::{NaiveDate, NaiveDateTime};

    const CALL_TIMEOUT: Duration = Duration::from_secs(5);

    fn ts(i: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, i, 0)
            .unwrap()
    }

    /// Single-message units whose content carries a unique `unit-NN` marker.
    fn units(n: u32) -> Vec<AnalysisUnit> {
        (0..n)
            .map(|i| {
                let msg = Message::new(ts(i), "Alice", format!("unit-{:02}", i));
                AnalysisUnit {
                    anchor: msg.clone(),
                    context: vec![msg],
                }
            })
            .collect()
    }

    async fn collect(mut conduit: ResultConduit) -> Vec<SummaryResult> {
        let mut out = Vec::new();
        while let Some(r) = conduit.recv().await {
            out.push(r);
        }
        out
    }

    /// Adapter that panics on one marker instead of returning an error.
    struct PanickingAi;

    #[async_trait::async_trait]
    impl AiPort for PanickingAi {
        async fn summarize(&self, request: &SummaryRequest) -> Result<String, DomainError> {
            if request.user_prompt.contains("unit-01") {
                panic!("adapter bug");
            }
            Ok("fine".to_string())
        }
    }

    #[test]
    fn test_build_request() {
        let a = Message::new(ts(0), "Bob", "hi");
        let b = Message::new(ts(1), "Alice", "hello");
        let unit = AnalysisUnit {
            anchor: b.clone(),
            context: vec![a, b],
        };
        let req = build_request("Summarize this.", &unit);
        assert_eq!(req.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(
            req.user_prompt,
            "Summarize this.\n\n2024-01-02 00:00:00: Bob: hi\n2024-01-02 00:01:00: Alice: hello\n"
        );
    }

    #[tokio::test]
    async fn test_completeness_under_failure() {
        let ai = Arc::new(
            MockAiAdapter::with_delay(5)
                .fail_on("unit-03")
                .fail_on("unit-07"),
        );
        let dispatcher = AnalysisDispatcher::new(ai, 4, CALL_TIMEOUT);
        let conduit = dispatcher.dispatch(units(10), "prompt", CancellationToken::new());
        assert_eq!(conduit.expected(), 10);

        let results = collect(conduit).await;
        assert_eq!(results.len(), 10);

        let mut failed: Vec<NaiveDateTime> = results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.anchor_timestamp)
            .collect();
        failed.sort();
        assert_eq!(failed, vec![ts(3), ts(7)]);

        for r in &results {
            if r.is_success() {
                assert!(!r.text.is_empty());
            } else {
                assert!(r.text.is_empty());
                assert!(matches!(r.error, Some(SummaryError::ServiceCallFailed(_))));
            }
        }
    }

    #[tokio::test]
    async fn test_panicking_adapter_still_yields_result() {
        let dispatcher = AnalysisDispatcher::new(Arc::new(PanickingAi), 2, CALL_TIMEOUT);
        let conduit = dispatcher.dispatch(units(3), "p", CancellationToken::new());
        let results = collect(conduit).await;
        assert_eq!(results.len(), 3);

        let failed: Vec<&SummaryResult> = results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].anchor_timestamp, ts(1));
        match &failed[0].error {
            Some(SummaryError::ServiceCallFailed(detail)) => {
                assert!(detail.starts_with("worker panicked"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_order_independence() {
        // Earlier units are slower, so arrival order differs from submission order.
        let ai = Arc::new(
            MockAiAdapter::with_delay(1)
                .delay_on("unit-00", 60)
                .delay_on("unit-01", 40)
                .delay_on("unit-02", 20),
        );
        let dispatcher = AnalysisDispatcher::new(ai, 8, CALL_TIMEOUT);
        let submitted = units(6);
        let mut expected: Vec<NaiveDateTime> =
            submitted.iter().map(|u| u.anchor.timestamp).collect();

        let conduit = dispatcher.dispatch(submitted, "p", CancellationToken::new());
        let results = collect(conduit).await;
        let arrival: Vec<NaiveDateTime> = results.iter().map(|r| r.anchor_timestamp).collect();
        assert_ne!(arrival, expected);

        let mut received = arrival;
        received.sort();
        expected.sort();
        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let ai = Arc::new(MockAiAdapter::with_delay(20));
        let dispatcher = AnalysisDispatcher::new(ai.clone(), 3, CALL_TIMEOUT);
        let conduit = dispatcher.dispatch(units(12), "p", CancellationToken::new());
        let results = collect(conduit).await;
        assert_eq!(results.len(), 12);
        assert_eq!(ai.call_count(), 12);
        assert!(ai.peak_concurrency() <= 3);
        assert!(ai.peak_concurrency() >= 1);
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        let ai = Arc::new(MockAiAdapter::with_delay(1).delay_on("unit-01", 5_000));
        let dispatcher = AnalysisDispatcher::new(ai, 2, Duration::from_millis(50));
        let conduit = dispatcher.dispatch(units(2), "p", CancellationToken::new());
        let results = collect(conduit).await;
        assert_eq!(results.len(), 2);
        let failed: Vec<&SummaryResult> = results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].anchor_timestamp, ts(1));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_yields_one_result_per_unit() {
        let ai = Arc::new(MockAiAdapter::with_delay(1));
        let dispatcher = AnalysisDispatcher::new(ai.clone(), 2, CALL_TIMEOUT);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let results = collect(dispatcher.dispatch(units(5), "p", cancel)).await;
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.error == Some(SummaryError::Cancelled)));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_run() {
        let ai = Arc::new(MockAiAdapter::with_delay(30));
        let dispatcher = AnalysisDispatcher::new(ai, 1, CALL_TIMEOUT);
        let cancel = CancellationToken::new();
        let mut conduit = dispatcher.dispatch(units(6), "p", cancel.clone());

        let first = conduit.recv().await.unwrap();
        cancel.cancel();
        let mut results = vec![first];
        while let Some(r) = conduit.recv().await {
            results.push(r);
        }

        assert_eq!(results.len(), 6);
        assert!(results[0].is_success());
        assert!(results.iter().any(|r| r.error == Some(SummaryError::Cancelled)));
    }

    #[tokio::test]
    async fn test_empty_run_finishes_immediately() {
        let dispatcher = AnalysisDispatcher::new(Arc::new(MockAiAdapter::new()), 2, CALL_TIMEOUT);
        let conduit = dispatcher.dispatch(Vec::new(), "p", CancellationToken::new());
        let results = collect(conduit).await;
        assert!(results.is_empty());
    }
}
