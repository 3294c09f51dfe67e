//! The measurement stream loop.
//!
//! A linear state machine: send the start command, then read lines until
//! the stop flag is raised (clean stop, exit 0) or the connection fails
//! (escalated to the caller, exit 2). Lines that do not parse are not
//! errors; they degrade to raw passthrough.

use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::device;
use crate::error::AppResult;
use crate::parse::{format_sig, Sample};
use crate::storage::CsvSink;
use crate::transport::Transport;

/// Console rendering of a parsed sample, six significant digits, reordered
/// to X, Y, Z for display.
pub fn render_sample(sample: &Sample) -> String {
    format!(
        "X={}, Y={}, Z={}",
        format_sig(sample.x, 6),
        format_sig(sample.y, 6),
        format_sig(sample.z, 6)
    )
}

/// Start streaming and pump lines until `stop` is set.
///
/// In raw mode every line is printed verbatim; otherwise each line is
/// parsed, falling back to verbatim output when parsing fails. When a sink
/// is present every line also lands in the CSV log.
pub fn run_stream<T: Transport>(
    link: &mut T,
    sink: &mut Option<CsvSink>,
    raw_mode: bool,
    stop: &AtomicBool,
) -> AppResult<()> {
    device::start_stream(link)?;
    println!("Reading measurements (Ctrl+C to stop)...");

    while !stop.load(Ordering::SeqCst) {
        let Some(line) = link.read_line()? else {
            // Per-read timeout with no data; stay responsive to the flag.
            continue;
        };

        if raw_mode {
            emit_raw(&line, sink)?;
            continue;
        }

        match Sample::from_line(&line) {
            Some(sample) => {
                println!("{}", render_sample(&sample));
                if let Some(sink) = sink.as_mut() {
                    sink.write_sample(&sample)?;
                }
            }
            None => emit_raw(&line, sink)?,
        }
    }

    info!("stream loop stopped by user");
    println!("Stopped.");
    Ok(())
}

fn emit_raw(line: &str, sink: &mut Option<CsvSink>) -> AppResult<()> {
    println!("{line}");
    if let Some(sink) = sink.as_mut() {
        sink.write_raw(line)?;
    }
    Ok(())
}
