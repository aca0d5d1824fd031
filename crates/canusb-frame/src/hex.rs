//! Hex-string conversion for identifiers and payloads given on the command line.

use std::fmt;

use tracing::warn;

use crate::codec::MAX_PAYLOAD;
use crate::error::{FrameError, Result};

/// A CAN arbitration identifier as the adapter carries it: two bytes, LSB first on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub lsb: u8,
    pub msb: u8,
}

impl Identifier {
    pub fn new(lsb: u8, msb: u8) -> Self {
        Self { lsb, msb }
    }

    pub fn from_raw(raw: u16) -> Self {
        let [lsb, msb] = raw.to_le_bytes();
        Self { lsb, msb }
    }

    pub fn raw(self) -> u16 {
        u16::from_le_bytes([self.lsb, self.msb])
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}", self.msb, self.lsb)
    }
}

/// Space-separated lowercase hex rendering of a byte slice, for logs and output.
#[derive(Debug, Clone, Copy)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Value of one ASCII hex digit, or `None` if `c` is not one.
pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Parse a 1-3 digit hex identifier.
///
/// One or two digits fill only the LSB. With three digits the first one is
/// the MSB and the remaining two the LSB.
pub fn decode_identifier(hex: &str) -> Result<Identifier> {
    let invalid = || FrameError::InvalidIdentifier(hex.to_string());

    let digits = hex
        .bytes()
        .map(hex_value)
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(invalid)?;

    match digits.as_slice() {
        [lo] => Ok(Identifier::new(*lo, 0)),
        [hi, lo] => Ok(Identifier::new(hi * 16 + lo, 0)),
        [msb, hi, lo] => Ok(Identifier::new(hi * 16 + lo, *msb)),
        _ => Err(invalid()),
    }
}

/// Result of [`decode_payload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedPayload {
    pub bytes: Vec<u8>,
    /// Decoding stopped because `max_len` bytes had been produced.
    pub truncated: bool,
}

/// Decode pairs of hex digits into bytes, skipping anything that is not a hex digit.
///
/// Separators are free-form: `"1A 2B:3c"` decodes the same as `"1A2B3c"`.
/// Decoding stops as soon as `max_len` bytes have been produced, and that is
/// reported as truncation even when no digits are left over. A trailing
/// unpaired digit is dropped.
pub fn decode_payload(hex: &str, max_len: usize) -> DecodedPayload {
    let mut out = DecodedPayload::default();
    if max_len == 0 {
        return out;
    }

    let mut high: Option<u8> = None;
    for nibble in hex.bytes().filter_map(hex_value) {
        let Some(hi) = high.take() else {
            high = Some(nibble);
            continue;
        };
        out.bytes.push(hi * 16 + nibble);
        if out.bytes.len() == max_len {
            out.truncated = true;
            warn!(len = max_len, "hex string truncated to {} bytes", max_len);
            break;
        }
    }
    out
}

/// Decode a data-frame payload (at most 8 bytes); an empty result is an error.
pub fn parse_payload(hex: &str) -> Result<Vec<u8>> {
    let decoded = decode_payload(hex, MAX_PAYLOAD);
    if decoded.bytes.is_empty() {
        return Err(FrameError::InvalidPayload(format!(
            "{hex:?} contains no hex byte"
        )));
    }
    Ok(decoded.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_digits() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'A'), Some(10));
        assert_eq!(hex_value(b'f'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b' '), None);
    }

    #[test]
    fn hex_bytes_display() {
        assert_eq!(HexBytes(&[0xAA, 0x0C, 0x55]).to_string(), "aa 0c 55");
        assert_eq!(HexBytes(&[]).to_string(), "");
    }

    #[test]
    fn identifier_lengths() {
        assert_eq!(decode_identifier("A").unwrap(), Identifier::new(0x0A, 0x00));
        assert_eq!(decode_identifier("7f").unwrap(), Identifier::new(0x7F, 0x00));
        assert_eq!(decode_identifier("1A2").unwrap(), Identifier::new(0xA2, 0x01));
        assert_eq!(decode_identifier("7FF").unwrap().raw(), 0x07FF);
    }

    #[test]
    fn identifier_rejects_bad_lengths() {
        assert!(matches!(
            decode_identifier(""),
            Err(FrameError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            decode_identifier("ABCD"),
            Err(FrameError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn identifier_rejects_non_hex() {
        assert!(matches!(
            decode_identifier("1G"),
            Err(FrameError::InvalidIdentifier(s)) if s == "1G"
        ));
    }

    #[test]
    fn identifier_display_is_msb_first() {
        assert_eq!(Identifier::new(0x23, 0x01).to_string(), "0123");
        assert_eq!(Identifier::from_raw(0x0456), Identifier::new(0x56, 0x04));
    }

    #[test]
    fn payload_pairs_digits() {
        let decoded = decode_payload("1A2B3C", 8);
        assert_eq!(decoded.bytes, vec![0x1A, 0x2B, 0x3C]);
        assert!(!decoded.truncated);
    }

    #[test]
    fn payload_truncates_at_max_len() {
        let decoded = decode_payload("1A2B3C", 2);
        assert_eq!(decoded.bytes, vec![0x1A, 0x2B]);
        assert!(decoded.truncated);
    }

    #[test]
    fn payload_filling_max_len_reports_truncation() {
        let decoded = decode_payload("1A2B", 2);
        assert_eq!(decoded.bytes, vec![0x1A, 0x2B]);
        assert!(decoded.truncated);

        let decoded = decode_payload("0011223344556677", 8);
        assert_eq!(decoded.bytes.len(), 8);
        assert!(decoded.truncated);
    }

    #[test]
    fn payload_short_of_max_len_is_not_truncated() {
        let decoded = decode_payload("1A2B3", 3);
        assert_eq!(decoded.bytes, vec![0x1A, 0x2B]);
        assert!(!decoded.truncated);
        assert_eq!(decode_payload("1A", 0), DecodedPayload::default());
    }

    #[test]
    fn payload_skips_separators() {
        let decoded = decode_payload("de:ad be-EF", 8);
        assert_eq!(decoded.bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode_payload("1A 2B:3c", 8).bytes, decode_payload("1A2B3c", 8).bytes);
    }

    #[test]
    fn payload_drops_trailing_nibble() {
        assert_eq!(decode_payload("123", 8).bytes, vec![0x12]);
        assert!(decode_payload("1", 8).bytes.is_empty());
        assert!(decode_payload("xyz", 8).bytes.is_empty());
    }

    #[test]
    fn parse_payload_requires_a_byte() {
        assert_eq!(parse_payload("0102").unwrap(), vec![1, 2]);
        assert!(matches!(
            parse_payload("z"),
            Err(FrameError::InvalidPayload(_))
        ));
        assert_eq!(parse_payload("000102030405060708").unwrap().len(), 8);
    }
}
