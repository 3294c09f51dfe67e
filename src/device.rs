//! Device probe and command protocol for the magnetic sensor boards.
//!
//! The boards speak a tiny ASCII protocol: CR-terminated two-digit commands,
//! newline-terminated replies. Probing (`31` for sensor type, `30` for
//! firmware) is purely diagnostic; a silent device yields absent values and
//! never blocks the stream from starting.

use std::thread;
use std::time::Duration;

use log::debug;

use crate::error::AppResult;
use crate::transport::Transport;

/// Query sensor type; reply is a single digit code `0`..`4`.
pub const CMD_QUERY_TYPE: &[u8] = b"31\r";
/// Query firmware version; reply is an arbitrary single line.
pub const CMD_QUERY_FIRMWARE: &[u8] = b"30\r";
/// Start continuous measurement streaming.
pub const CMD_START_STREAM: &[u8] = b"32\r";

/// Wait after a probe command before checking for a reply.
const PROBE_DELAY: Duration = Duration::from_millis(50);
/// Wait after a fire-and-forget command (axis select, stream start).
const SETTLE_DELAY: Duration = Duration::from_millis(20);

const AXIS_COMMANDS: [(&str, &[u8]); 4] = [
    ("x", b"13\r"),
    ("y", b"14\r"),
    ("z", b"15\r"),
    ("tri", b"34\r"),
];

/// Sensor models reported by the type query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Ak09973d,
    Ak09940a,
    Tlv493d,
    Tmag3001a1,
    Tmag3001a2,
    Unknown,
}

impl SensorKind {
    /// Map a type-query reply to a sensor model. Unrecognized codes map to
    /// [`SensorKind::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => SensorKind::Ak09973d,
            "1" => SensorKind::Ak09940a,
            "2" => SensorKind::Tlv493d,
            "3" => SensorKind::Tmag3001a1,
            "4" => SensorKind::Tmag3001a2,
            _ => SensorKind::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Ak09973d => "AK09973D",
            SensorKind::Ak09940a => "AK09940A",
            SensorKind::Tlv493d => "TLV493D",
            SensorKind::Tmag3001a1 => "TMAG3001A1",
            SensorKind::Tmag3001a2 => "TMAG3001A2",
            SensorKind::Unknown => "Unknown",
        }
    }
}

/// Identity reported by [`probe`].
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Raw type code, present only when the device replied with `0`..`4`.
    pub code: Option<String>,
    pub kind: SensorKind,
    /// Firmware string, trimmed, with no further validation.
    pub firmware: Option<String>,
}

/// Command bytes for an axis key, looked up case-insensitively.
pub fn axis_command(axis: &str) -> Option<&'static [u8]> {
    let key = axis.to_ascii_lowercase();
    AXIS_COMMANDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, cmd)| *cmd)
}

/// Query sensor type and firmware. Every step is best-effort: a device that
/// does not answer (or answers garbage) yields absent values, not an error.
pub fn probe<T: Transport>(link: &mut T) -> DeviceInfo {
    let code = query(link, CMD_QUERY_TYPE)
        .filter(|reply| matches!(reply.as_str(), "0" | "1" | "2" | "3" | "4"));
    let kind = code
        .as_deref()
        .map(SensorKind::from_code)
        .unwrap_or(SensorKind::Unknown);
    let firmware = query(link, CMD_QUERY_FIRMWARE).filter(|fw| !fw.is_empty());

    debug!("probe result: code={:?} firmware={:?}", code, firmware);
    DeviceInfo {
        code,
        kind,
        firmware,
    }
}

/// Select the reported axis mode. Returns `false` for an unknown axis key
/// (nothing is written) or when the write fails; there is no read-back.
pub fn set_axis<T: Transport>(link: &mut T, axis: &str) -> bool {
    let Some(command) = axis_command(axis) else {
        return false;
    };
    if link.write_command(command).is_err() {
        return false;
    }
    thread::sleep(SETTLE_DELAY);
    true
}

/// Ask the device to start streaming measurement lines.
pub fn start_stream<T: Transport>(link: &mut T) -> AppResult<()> {
    link.write_command(CMD_START_STREAM)?;
    thread::sleep(SETTLE_DELAY);
    Ok(())
}

/// One clear/write/wait/read probe exchange. Any failure collapses to `None`.
fn query<T: Transport>(link: &mut T, command: &[u8]) -> Option<String> {
    link.clear_input().ok()?;
    link.write_command(command).ok()?;
    thread::sleep(PROBE_DELAY);
    if link.bytes_available().ok()? == 0 {
        return None;
    }
    link.read_line().ok().flatten()
}
