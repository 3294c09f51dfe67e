//! Custom error types for the application.
//!
//! `StreamError` is the single error type for the whole program, built with
//! `thiserror`. Only failures that abort the run appear here: device probing
//! and axis selection are best-effort and report absence through `Option` /
//! `bool` instead of an error.
//!
//! Each variant maps to one of the process exit codes:
//!
//! - `NoPortFound` -> 1
//! - `Serial` / `Io` (connection-level failures) -> 2
//! - everything else -> 3
//!
//! A user interrupt is not an error and exits with code 0.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, StreamError>;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("no USB-serial port detected; specify one with --port")]
    NoPortFound,

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV log error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open CSV log '{path}': {source}")]
    CsvOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}

impl StreamError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            StreamError::NoPortFound => 1,
            StreamError::Serial(_) | StreamError::Io(_) => 2,
            _ => 3,
        }
    }
}
