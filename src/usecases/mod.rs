//! Application use cases. Orchestrate domain logic via ports.

pub mod analysis_service;
pub mod conduit;
pub mod dispatcher;
pub mod participants;
pub mod result_sink;
pub mod window;

pub use analysis_service::{AnalysisRequest, AnalysisRun, AnalysisService};
pub use conduit::{Drained, ResultConduit};
pub use dispatcher::{AnalysisDispatcher, DEFAULT_MAX_CONCURRENCY, SYSTEM_INSTRUCTION};
pub use participants::{distinct_authors, filter_authors};
pub use result_sink::{CollectingSink, DrainStatus, ResultSink, drain_into, poll_until_complete};
pub use window::{DEFAULT_RADIUS, windows};
