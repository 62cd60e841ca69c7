//! Transcript adapter. Reads exported chat CSV files into the domain `Transcript`.

pub mod csv_loader;
pub mod timestamp;

pub use csv_loader::{LoadReport, SkippedRow, load_path, load_reader};
pub use timestamp::{TIMESTAMP_FORMATS, parse_timestamp};
