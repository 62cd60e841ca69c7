//! Delivery conduit between dispatch workers and the consumer.
//!
//! Multi-producer, single-consumer. Finished once every worker has dropped its sender.

use crate::domain::SummaryResult;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Results currently available plus whether the producers are done.
#[derive(Debug, Default)]
pub struct Drained {
    pub results: Vec<SummaryResult>,
    pub finished: bool,
}

/// Receiving end of one analysis run.
#[derive(Debug)]
pub struct ResultConduit {
    rx: mpsc::UnboundedReceiver<SummaryResult>,
    expected: usize,
    received: usize,
}

impl ResultConduit {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<SummaryResult>, expected: usize) -> Self {
        Self {
            rx,
            expected,
            received: 0,
        }
    }

    /// Number of units submitted for this run.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of results handed out so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Take everything available right now. Never blocks.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.rx.try_recv() {
                Ok(result) => drained.results.push(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.finished = true;
                    break;
                }
            }
        }
        self.received += drained.results.len();
        drained
    }

    /// Wait for the next result. `None` once the run is finished and drained.
    pub async fn recv(&mut self) -> Option<SummaryResult> {
        let next = self.rx.recv().await;
        if next.is_some() {
            self.received += 1;
        }
        next
    }
}
