//! Domain entities. Pure data structures for the core business.
//!
//! No CSV or HTTP types here. Adapters map into these.

use chrono::NaiveDateTime;

use super::errors::SummaryError;

/// Rendering used for timestamps inside prompts and terminal output.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single message from an exported transcript. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub timestamp: NaiveDateTime,
    pub author: String,
    pub content: String,
}

impl Message {
    pub fn new(
        timestamp: NaiveDateTime,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            content: content.into(),
        }
    }

    /// One prompt line: `timestamp: author: content`.
    pub fn render_line(&self) -> String {
        format!(
            "{}: {}: {}",
            self.timestamp.format(TIMESTAMP_DISPLAY_FORMAT),
            self.author,
            self.content
        )
    }
}

/// Messages in file row order. Never re-sorted or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// One message by the target participant plus its clipped neighborhood.
///
/// `context` is a contiguous slice of the transcript and always contains `anchor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisUnit {
    pub anchor: Message,
    pub context: Vec<Message>,
}

impl AnalysisUnit {
    /// Context rendered one message per line, in transcript order.
    pub fn render_context(&self) -> String {
        let mut out = String::new();
        for msg in &self.context {
            out.push_str(&msg.render_line());
            out.push('\n');
        }
        out
    }
}

/// Request contract for the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// Outcome of one analysis call. Exactly one per submitted unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub anchor_timestamp: NaiveDateTime,
    pub text: String,
    pub error: Option<SummaryError>,
}

impl SummaryResult {
    pub fn success(anchor_timestamp: NaiveDateTime, text: String) -> Self {
        Self {
            anchor_timestamp,
            text,
            error: None,
        }
    }

    pub fn failure(anchor_timestamp: NaiveDateTime, error: SummaryError) -> Self {
        Self {
            anchor_timestamp,
            text: String::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
