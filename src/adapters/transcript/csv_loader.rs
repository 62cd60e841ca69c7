//! CSV transcript loader. Uses the `csv` crate for quoting and escaping.
//!
//! Expected layout: a header row, then `timestamp,author,content`. Bad rows are
//! skipped and reported; they never fail the batch.

use super::timestamp::parse_timestamp;
use crate::domain::{DomainError, Message, RowParseError, Transcript};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Number of fields in a well-formed row.
const FIELD_COUNT: usize = 3;

/// A row excluded from the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source (header is line 1).
    pub line: u64,
    pub reason: RowParseError,
}

/// Parsed transcript plus diagnostics for every skipped row.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub transcript: Transcript,
    pub skipped: Vec<SkippedRow>,
}

/// Load a transcript from a UTF-8 CSV file.
///
/// Only failure to open the file is an error; row-level problems end up in
/// `LoadReport::skipped`.
pub fn load_path(path: &Path) -> Result<LoadReport, DomainError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DomainError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let report = load_reader(file);
    info!(
        path = %path.display(),
        messages = report.transcript.len(),
        skipped = report.skipped.len(),
        "transcript loaded"
    );
    Ok(report)
}

/// Load a transcript from any reader. The first row is always treated as the header.
pub fn load_reader<R: Read>(reader: R) -> LoadReport {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();

    for (idx, record) in rdr.records().enumerate() {
        // Fallback line number when the reader has no position (header is line 1).
        let fallback_line = idx as u64 + 2;
        let parsed = match record {
            Ok(rec) => {
                let line = rec.position().map(|p| p.line()).unwrap_or(fallback_line);
                (line, parse_record(&rec))
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                (line, Err(RowParseError::Malformed(e.to_string())))
            }
        };

        match parsed {
            (_, Ok(message)) => report.transcript.push(message),
            (line, Err(reason)) => {
                match &reason {
                    RowParseError::FieldCount(_) => debug!(line, %reason, "row skipped"),
                    _ => warn!(line, %reason, "row skipped"),
                }
                report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    report
}

fn parse_record(rec: &csv::StringRecord) -> Result<Message, RowParseError> {
    if rec.len() != FIELD_COUNT {
        return Err(RowParseError::FieldCount(rec.len()));
    }
    let timestamp = parse_timestamp(&rec[0])?;
    Ok(Message::new(timestamp, &rec[1], &rec[2]))
}
