//! CSV measurement log.
//!
//! The sink appends to its file so repeated runs accumulate into one log;
//! the header row is written only when the file is created. Every record is
//! flushed immediately so a killed process loses nothing.

use std::fs::{File, OpenOptions};
use std::path::Path;

use chrono::Local;
use log::info;

use crate::error::{AppResult, StreamError};
use crate::parse::{format_sig, Sample};

pub const CSV_HEADER: [&str; 5] = ["timestamp_iso", "raw", "Z", "Y", "X"];

/// Second-precision ISO-8601, e.g. `2026-08-28T14:03:07`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Open `path` in append mode, writing the header only if the file did
    /// not already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let existed = path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| StreamError::CsvOpen {
                path: path.to_path_buf(),
                source,
            })?;

        let mut writer = csv::Writer::from_writer(file);
        if !existed {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
        }
        info!("CSV log opened at '{}'", path.display());
        Ok(Self { writer })
    }

    /// Append a parsed sample: timestamp, raw text, then Z, Y, X at nine
    /// significant digits.
    pub fn write_sample(&mut self, sample: &Sample) -> AppResult<()> {
        self.writer.write_record([
            sample.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            sample.raw.clone(),
            format_sig(sample.z, 9),
            format_sig(sample.y, 9),
            format_sig(sample.x, 9),
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    /// Append an unparsed line with empty numeric columns.
    pub fn write_raw(&mut self, raw: &str) -> AppResult<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.writer
            .write_record([timestamp.as_str(), raw, "", "", ""])?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_written_once_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        {
            let mut sink = CsvSink::open(&path).unwrap();
            sink.write_raw("first run").unwrap();
        }
        {
            let mut sink = CsvSink::open(&path).unwrap();
            sink.write_raw("second run").unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let header_count = contents
            .lines()
            .filter(|line| *line == "timestamp_iso,raw,Z,Y,X")
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn raw_rows_have_empty_numeric_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        let mut sink = CsvSink::open(&path).unwrap();
        sink.write_raw("garbled ####").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert!(row.contains("garbled ####"));
        assert!(row.ends_with(",,,"));
    }

    #[test]
    fn sample_rows_use_nine_significant_digits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        let mut sink = CsvSink::open(&path).unwrap();
        let sample = Sample::from_line("A B -1.123456789 2.0 3.0").unwrap();
        sink.write_sample(&sample).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert!(row.ends_with(",-1.12345679,2,3"));
    }

    #[test]
    fn open_failure_is_not_a_connection_error() {
        let err = CsvSink::open("/nonexistent-dir/out.csv").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
