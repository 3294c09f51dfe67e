//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_BAUD: u32 = 115_200;

/// Read a USB-serial magnetic sensor stream and print or log the values.
#[derive(Parser, Debug)]
#[command(name = "magstream", version)]
pub struct Cli {
    /// Serial port (e.g. COM5 or /dev/ttyACM0); auto-detected when omitted
    #[arg(long)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Select the reported axis before streaming
    #[arg(long, value_parser = ["x", "y", "z", "tri"], ignore_case = true)]
    pub axis: Option<String>,

    /// Print raw lines instead of parsed X/Y/Z values
    #[arg(long)]
    pub raw: bool,

    /// Append measurements to a CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Print detected port, sensor type, and firmware before streaming
    #[arg(long = "show-info", visible_alias = "show")]
    pub show_info: bool,
}
