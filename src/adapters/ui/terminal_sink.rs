//! Terminal result sink. Prints each summary above an indicatif progress bar.

use crate::domain::{SummaryResult, TIMESTAMP_DISPLAY_FORMAT};
use crate::usecases::ResultSink;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:30.magenta/cyan}] {pos}/{len} {msg}";

/// Renders results as they arrive and counts them against the submitted total.
pub struct TerminalSink {
    bar: ProgressBar,
    succeeded: usize,
    failed: usize,
}

impl TerminalSink {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_message("analyzing...");
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self {
            bar,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Stop the bar and return `(succeeded, failed)`.
    pub fn finish(self) -> (usize, usize) {
        self.bar.finish_with_message("done");
        (self.succeeded, self.failed)
    }
}

/// Block printed for one result.
pub fn render_result(result: &SummaryResult) -> String {
    let header = format!(
        "Date: {}",
        result.anchor_timestamp.format(TIMESTAMP_DISPLAY_FORMAT)
    );
    let body = match &result.error {
        None => result.text.clone(),
        Some(e) => format!("Error: {}", e),
    };
    format!("\n{}\n{}\n{}", header, body, "-".repeat(50))
}

impl ResultSink for TerminalSink {
    fn accept(&mut self, result: SummaryResult) {
        let block = render_result(&result);
        let styled = if result.is_success() {
            self.succeeded += 1;
            block.cyan().to_string()
        } else {
            self.failed += 1;
            block.red().to_string()
        };
        self.bar.println(styled);
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SummaryError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_render_success() {
        let r = SummaryResult::success(ts(), "A summary.".to_string());
        let out = render_result(&r);
        assert!(out.contains("Date: 2024-01-02 03:04:05"));
        assert!(out.contains("A summary."));
        assert!(out.ends_with(&"-".repeat(50)));
    }

    #[test]
    fn test_render_failure() {
        let r = SummaryResult::failure(ts(), SummaryError::ServiceCallFailed("503".to_string()));
        assert!(render_result(&r).contains("Error: service call failed: 503"));
    }

    #[test]
    fn test_sink_counts() {
        let mut sink = TerminalSink::new(2);
        sink.accept(SummaryResult::success(ts(), "ok".to_string()));
        sink.accept(SummaryResult::failure(ts(), SummaryError::Cancelled));
        assert_eq!(sink.finish(), (1, 1));
    }
}
