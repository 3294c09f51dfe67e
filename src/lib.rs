//! Core library for the magstream CLI.
//!
//! This library contains the serial transport seam, the device probe and
//! axis-selection protocol, the measurement line parser, and the CSV sink
//! used by the `magstream` binary.

pub mod cli;
pub mod device;
pub mod error;
pub mod parse;
pub mod port;
pub mod storage;
pub mod stream;
pub mod transport;
