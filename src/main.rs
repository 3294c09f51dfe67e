//! magstream binary: resolve a port, probe the device, stream measurements.

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::warn;

use magstream::cli::Cli;
use magstream::device;
use magstream::error::{AppResult, StreamError};
use magstream::port;
use magstream::storage::CsvSink;
use magstream::stream;
use magstream::transport::SerialTransport;

fn main() {
    env_logger::init();
    let args = Cli::parse();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

fn run(args: Cli) -> AppResult<()> {
    let port_name = args
        .port
        .clone()
        .or_else(port::auto_pick_port)
        .ok_or(StreamError::NoPortFound)?;

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst))?;

    let mut link = SerialTransport::open(&port_name, args.baud)?;

    let mut sink = match &args.csv {
        Some(path) => Some(CsvSink::open(path)?),
        None => None,
    };

    let info = device::probe(&mut link);
    if args.show_info {
        println!("PORT     : {} @ {}", port_name, args.baud);
        println!(
            "SENSOR   : {} ({})",
            info.kind.name(),
            info.code.as_deref().unwrap_or("-")
        );
        println!("FIRMWARE : {}", info.firmware.as_deref().unwrap_or("-"));
    }

    if let Some(axis) = &args.axis {
        if !device::set_axis(&mut link, axis) {
            warn!("axis '{}' not recognized; keeping device default", axis);
        }
    }

    stream::run_stream(&mut link, &mut sink, args.raw, &stop)
}
