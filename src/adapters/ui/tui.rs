//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Flow: transcript path -> participant search -> participant pick -> prompt -> streamed results.

use super::terminal_sink::TerminalSink;
use crate::domain::DomainError;
use crate::ports::InputPort;
use crate::usecases::{AnalysisRequest, AnalysisService, filter_authors, poll_until_complete};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Select, Text};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Neon prompt theme for every inquire prompt in the session.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

fn prompt_err(e: inquire::InquireError) -> DomainError {
    DomainError::Input(e.to_string())
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<AnalysisService>,
    poll_interval: Duration,
}

impl TuiInputPort {
    pub fn new(service: Arc<AnalysisService>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
        }
    }

    /// Narrow the participant list by a search term until one is picked.
    fn pick_participant(&self, authors: &BTreeSet<String>) -> Result<String, DomainError> {
        loop {
            let term = Text::new("Search participant (empty = list all):")
                .prompt()
                .map_err(prompt_err)?;
            let matches: Vec<String> = filter_authors(authors, &term).into_iter().collect();
            if matches.is_empty() {
                warn!(term = %term, "no participant matches");
                continue;
            }
            return Select::new("Participant to analyze:", matches)
                .with_page_size(15)
                .prompt()
                .map_err(prompt_err);
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let path = Text::new("Transcript CSV file:")
            .prompt()
            .map_err(prompt_err)?;
        let path = PathBuf::from(path.trim());
        if path.as_os_str().is_empty() {
            return Err(DomainError::InvalidSelection(
                "no transcript file selected".to_string(),
            ));
        }

        let authors = self.service.participants(&path)?;
        if authors.is_empty() {
            return Err(DomainError::InvalidSelection(format!(
                "no readable messages in {}",
                path.display()
            )));
        }
        info!(participants = authors.len(), "participants loaded");

        let target_author = self.pick_participant(&authors)?;
        let prompt_template = Text::new("Analysis prompt:")
            .with_help_message("Sent before each conversation excerpt")
            .prompt()
            .map_err(prompt_err)?;

        let request = AnalysisRequest {
            path,
            target_author,
            prompt_template: prompt_template.trim().to_string(),
        };

        let cancel = CancellationToken::new();
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctrl_c.cancel();
            }
        });

        let mut run = self.service.start(&request, cancel.clone())?;
        if run.rows_skipped > 0 {
            warn!(rows = run.rows_skipped, "some transcript rows were skipped");
        }

        let mut sink = TerminalSink::new(run.units_submitted);
        poll_until_complete(&mut run.conduit, &mut sink, self.poll_interval, &cancel).await;
        let (succeeded, failed) = sink.finish();

        info!(
            submitted = run.units_submitted,
            succeeded,
            failed,
            cancelled = cancel.is_cancelled(),
            "analysis finished"
        );
        Ok(())
    }
}
