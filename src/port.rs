//! Serial port enumeration and auto-selection.
//!
//! When no `--port` is given we score every enumerated port by how much its
//! name and descriptor text look like a USB CDC-ACM device and take the
//! best match. This is a best-effort heuristic, not a guarantee; ties keep
//! the first port in enumeration order.

use log::debug;
use serialport::{SerialPortInfo, SerialPortType};

/// Pick the most likely USB-serial port, or `None` when no port exists.
pub fn auto_pick_port() -> Option<String> {
    let ports = serialport::available_ports().unwrap_or_default();
    let picked = pick_best(&ports).map(|info| info.port_name.clone());
    debug!("auto-detected port: {:?}", picked);
    picked
}

/// Highest-scoring port; ties broken by enumeration order.
pub fn pick_best(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    let mut best: Option<(u32, &SerialPortInfo)> = None;
    for info in ports {
        let score = score_text(&descriptor_text(info));
        match best {
            Some((high, _)) if score <= high => {}
            _ => best = Some((score, info)),
        }
    }
    best.map(|(_, info)| info)
}

/// Substring-presence score, case-insensitive: +2 "usb", +2 "acm",
/// +1 "cdc", +1 "uart".
pub fn score_text(text: &str) -> u32 {
    let text = text.to_lowercase();
    let mut score = 0;
    if text.contains("usb") {
        score += 2;
    }
    if text.contains("acm") {
        score += 2;
    }
    if text.contains("cdc") {
        score += 1;
    }
    if text.contains("uart") {
        score += 1;
    }
    score
}

/// Concatenation of port name and whatever descriptor text the host OS
/// exposes for the port.
fn descriptor_text(info: &SerialPortInfo) -> String {
    let mut text = info.port_name.clone();
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            text.push_str(&format!(" USB VID:PID={:04x}:{:04x}", usb.vid, usb.pid));
            if let Some(manufacturer) = &usb.manufacturer {
                text.push(' ');
                text.push_str(manufacturer);
            }
            if let Some(product) = &usb.product {
                text.push(' ');
                text.push_str(product);
            }
        }
        SerialPortType::PciPort => text.push_str(" PCI"),
        SerialPortType::BluetoothPort => text.push_str(" Bluetooth"),
        SerialPortType::Unknown => {}
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_port(name: &str) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::Unknown,
        }
    }

    #[test]
    fn scoring_weights() {
        assert_eq!(score_text("/dev/ttyS0"), 0);
        assert_eq!(score_text("/dev/ttyUSB0"), 2);
        assert_eq!(score_text("/dev/ttyACM0 USB CDC"), 5);
        assert_eq!(score_text("UART bridge"), 1);
        // Case-insensitive.
        assert_eq!(score_text("usb AcM cDc uart"), 6);
    }

    #[test]
    fn pick_best_prefers_highest_score() {
        let ports = vec![
            plain_port("/dev/ttyS0"),
            plain_port("/dev/ttyACM0"),
            plain_port("/dev/ttyS1"),
        ];
        let picked = pick_best(&ports).unwrap();
        assert_eq!(picked.port_name, "/dev/ttyACM0");
    }

    #[test]
    fn pick_best_tie_keeps_enumeration_order() {
        let ports = vec![
            plain_port("/dev/ttyS0"),
            plain_port("/dev/ttyUSB0"),
            plain_port("/dev/ttyUSB1"),
        ];
        let picked = pick_best(&ports).unwrap();
        assert_eq!(picked.port_name, "/dev/ttyUSB0");
    }

    #[test]
    fn pick_best_empty_is_none() {
        assert!(pick_best(&[]).is_none());
    }
}
