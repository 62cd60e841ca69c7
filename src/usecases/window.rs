//! Window extractor: one analysis unit per message by the target author.

use crate::domain::{AnalysisUnit, Transcript};

/// Messages taken on each side of an anchor.
pub const DEFAULT_RADIUS: usize = 5;

/// Build an `AnalysisUnit` for every message whose author equals `target_author`.
///
/// Context for index `i` is `transcript[i - radius ..= i + radius]`, clipped to the
/// transcript bounds. Units come out in transcript order. No match yields an empty vec.
pub fn windows(transcript: &Transcript, target_author: &str, radius: usize) -> Vec<AnalysisUnit> {
    let messages = transcript.messages();
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.author == target_author)
        .map(|(i, anchor)| {
            let start = i.saturating_sub(radius);
            let end = messages.len().min(i.saturating_add(radius).saturating_add(1));
            AnalysisUnit {
                anchor: anchor.clone(),
                context: messages[start..end].to_vec(),
            }
        })
        .collect()
}
