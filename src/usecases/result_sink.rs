//! Result sink: forwards drained results to a consumer, exactly once, in arrival order.

use super::conduit::ResultConduit;
use crate::domain::SummaryResult;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Consumer of summary results. Rendering or storage is the implementor's concern.
pub trait ResultSink: Send {
    fn accept(&mut self, result: SummaryResult);
}

/// Keeps every result in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub results: Vec<SummaryResult>,
}

impl ResultSink for CollectingSink {
    fn accept(&mut self, result: SummaryResult) {
        self.results.push(result);
    }
}

/// Outcome of a single non-blocking drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainStatus {
    pub delivered: usize,
    pub finished: bool,
}

/// Drain whatever is available into `sink`. Returns immediately when nothing is pending.
///
/// Results drained after `cancel` fires are discarded instead of rendered.
pub fn drain_into(
    conduit: &mut ResultConduit,
    sink: &mut dyn ResultSink,
    cancel: &CancellationToken,
) -> DrainStatus {
    let drained = conduit.drain();
    let mut delivered = 0;
    for result in drained.results {
        if cancel.is_cancelled() {
            debug!(anchor = %result.anchor_timestamp, "run cancelled; result not rendered");
            continue;
        }
        sink.accept(result);
        delivered += 1;
    }
    DrainStatus {
        delivered,
        finished: drained.finished,
    }
}

/// Cooperative polling loop: drain every `interval` until the run finishes or is cancelled.
///
/// Returns the number of results delivered to `sink`.
pub async fn poll_until_complete(
    conduit: &mut ResultConduit,
    sink: &mut dyn ResultSink,
    interval: Duration,
    cancel: &CancellationToken,
) -> usize {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut delivered = 0;

    loop {
        ticker.tick().await;
        let status = drain_into(conduit, sink, cancel);
        delivered += status.delivered;
        if status.finished {
            break;
        }
        if cancel.is_cancelled() {
            info!(delivered, "polling stopped: run cancelled");
            break;
        }
    }

    debug!(
        delivered,
        expected = conduit.expected(),
        "result polling finished"
    );
    delivered
}
