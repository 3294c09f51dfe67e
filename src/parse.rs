//! Measurement line parsing.
//!
//! Stream lines are whitespace-delimited ASCII in the common case, with the
//! three field values at token positions 2, 3, 4 (wire order Z, Y, X). The
//! parser first tries that split; if the tokens are not numeric it falls
//! back to pulling every float-looking substring out of the line and taking
//! positions 2, 3, 4 of those. Lines that fit neither shape are passed
//! through as raw text by the caller.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

/// Optional sign, digits with optional fraction or leading-dot fraction,
/// optional exponent.
static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("float pattern is valid")
});

/// Extract the field triple from a line, in wire order (Z, Y, X).
pub fn parse_triple(text: &str) -> Option<(f64, f64, f64)> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() >= 5 {
        if let (Ok(z), Ok(y), Ok(x)) = (parts[2].parse(), parts[3].parse(), parts[4].parse()) {
            return Some((z, y, x));
        }
    }

    let found: Vec<&str> = FLOAT_PATTERN.find_iter(text).map(|m| m.as_str()).collect();
    if found.len() >= 5 {
        // The pattern should guarantee these parse; bail out if not.
        return match (found[2].parse(), found[3].parse(), found[4].parse()) {
            (Ok(z), Ok(y), Ok(x)) => Some((z, y, x)),
            _ => None,
        };
    }

    None
}

/// One parsed measurement line. Field order follows the wire format (Z, Y,
/// X); display and CSV output reorder as needed.
#[derive(Debug, Clone)]
pub struct Sample {
    pub z: f64,
    pub y: f64,
    pub x: f64,
    /// Original line text, untouched.
    pub raw: String,
    /// Capture time, local clock.
    pub timestamp: DateTime<Local>,
}

impl Sample {
    /// Parse `raw` into a sample stamped with the current time.
    pub fn from_line(raw: &str) -> Option<Self> {
        let (z, y, x) = parse_triple(raw)?;
        Some(Sample {
            z,
            y,
            x,
            raw: raw.to_string(),
            timestamp: Local::now(),
        })
    }
}

/// Format `value` with at most `digits` significant digits, trimming
/// trailing zeros (the shape of C's `%g`).
pub fn format_sig(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1) as i32;
    let exponent = value.abs().log10().floor() as i32;

    if exponent < -4 || exponent >= digits {
        let formatted = format!("{:.*e}", (digits - 1) as usize, value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_trailing_zeros(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (digits - 1 - exponent).max(0) as usize;
        trim_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn trim_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_split_takes_positions_2_3_4() {
        assert_eq!(parse_triple("A B 1.0 2.0 3.0"), Some((1.0, 2.0, 3.0)));
        assert_eq!(
            parse_triple("head 0 -1.0 2.0 3.0 extra"),
            Some((-1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn regex_fallback_extracts_embedded_floats() {
        // Six matches: 0, 1.5, 2.5, -3.25, 0.0, 9.9 -> positions 2,3,4.
        assert_eq!(
            parse_triple("t=0 a:1.5,b:2.5,c:-3.25,d:0.0,e:9.9"),
            Some((2.5, -3.25, 0.0))
        );
    }

    #[test]
    fn exponent_notation_is_accepted() {
        assert_eq!(
            parse_triple("S 0 1.5e-3 -2E2 +0.5 end"),
            Some((0.0015, -200.0, 0.5))
        );
    }

    #[test]
    fn short_lines_yield_nothing() {
        assert_eq!(parse_triple("1.0 2.0"), None);
        assert_eq!(parse_triple(""), None);
        assert_eq!(parse_triple("no numbers here at all"), None);
    }

    #[test]
    fn non_numeric_tokens_fall_back_to_pattern_matches() {
        // Split path fails on token "Y"; the pattern path finds six
        // numeric substrings (the digit in "m1" counts) and uses those.
        assert_eq!(
            parse_triple("m1 0 Y 3.5 4.5 5.5 6.5"),
            Some((3.5, 4.5, 5.5))
        );
    }

    #[test]
    fn sample_keeps_raw_text() {
        let sample = Sample::from_line("A B 1.0 2.0 3.0").unwrap();
        assert_eq!(sample.raw, "A B 1.0 2.0 3.0");
        assert_eq!((sample.z, sample.y, sample.x), (1.0, 2.0, 3.0));
    }

    #[test]
    fn format_sig_trims_trailing_zeros() {
        assert_eq!(format_sig(3.0, 6), "3");
        assert_eq!(format_sig(-1.0, 6), "-1");
        assert_eq!(format_sig(-3.25, 6), "-3.25");
        assert_eq!(format_sig(0.0, 6), "0");
        assert_eq!(format_sig(123.456789, 6), "123.457");
    }

    #[test]
    fn format_sig_switches_to_exponent_form() {
        assert_eq!(format_sig(0.0000123, 6), "1.23e-5");
        assert_eq!(format_sig(1234567.0, 6), "1.23457e6");
    }
}
