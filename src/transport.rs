//! Blocking transport seam between the protocol logic and the serial port.
//!
//! The probe, axis-selection, and stream-loop code talk to the device through
//! the [`Transport`] trait rather than `serialport` directly, so tests can
//! substitute a scripted device. [`SerialTransport`] is the one production
//! implementation.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use log::debug;
use serialport::{ClearBuffer, SerialPort};

use crate::error::AppResult;

/// Per-read timeout. Short so the stream loop stays responsive to Ctrl+C
/// even when the device goes quiet.
pub const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Byte-level access to the sensor connection.
pub trait Transport {
    /// Discard any buffered input.
    fn clear_input(&mut self) -> AppResult<()>;

    /// Write a raw command and flush it.
    fn write_command(&mut self, command: &[u8]) -> AppResult<()>;

    /// Number of bytes waiting to be read.
    fn bytes_available(&mut self) -> AppResult<usize>;

    /// Read one newline-terminated line, lossily decoded and trimmed.
    ///
    /// Returns `Ok(None)` when the read timed out with no data. A timeout
    /// mid-line yields the partial line, matching the behavior of a plain
    /// timed `readline` on the wire.
    fn read_line(&mut self) -> AppResult<Option<String>>;
}

/// [`Transport`] over a real serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `port_name` at `baud` with the short per-read timeout.
    pub fn open(port_name: &str, baud: u32) -> AppResult<Self> {
        let port = serialport::new(port_name, baud)
            .timeout(READ_TIMEOUT)
            .open()?;
        debug!("serial port '{}' opened at {} baud", port_name, baud);
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn clear_input(&mut self) -> AppResult<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn write_command(&mut self, command: &[u8]) -> AppResult<()> {
        self.port.write_all(command)?;
        self.port.flush()?;
        debug!("sent command: {:?}", String::from_utf8_lossy(command));
        Ok(())
    }

    fn bytes_available(&mut self) -> AppResult<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_line(&mut self) -> AppResult<Option<String>> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    line.push(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }

        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
        }
    }
}
