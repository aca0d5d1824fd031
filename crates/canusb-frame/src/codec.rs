use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::checksum;
use crate::error::{FrameError, Result};
use crate::hex::Identifier;
use crate::settings::{FrameType, Mode, Speed};

/// First byte of every adapter frame.
pub const START_BYTE: u8 = 0xAA;

/// Last byte of a data frame; second byte of a configuration frame.
pub const END_BYTE: u8 = 0x55;

/// Configuration frames are always 20 bytes.
pub const CONFIG_FRAME_LEN: usize = 20;

/// Data frame bytes besides the payload: start, info, 2 id bytes, end.
pub const DATA_FRAME_OVERHEAD: usize = 5;

/// A CAN data frame carries at most 8 payload bytes.
pub const MAX_PAYLOAD: usize = 8;

/// Bits 7 and 6 of a data frame's info byte are always set.
pub const INFO_MARKER: u8 = 0xC0;

const CONFIG_COMMAND: u8 = 0x12;
const CONFIG_TRAILER: u8 = 0x01;

const SPEED_OFFSET: usize = 3;
const FRAME_TYPE_OFFSET: usize = 4;
const MODE_OFFSET: usize = 13;
const TRAILER_OFFSET: usize = 14;
const CHECKSUM_OFFSET: usize = CONFIG_FRAME_LEN - 1;

/// The fixed-size frame that sets bus speed, mode and frame type.
///
/// Wire format:
/// ```text
/// ┌────┬────┬────┬───────┬───────┬──────────┬──────┬────┬──────────┬──────────┐
/// │ AA │ 55 │ 12 │ speed │ ftype │ 00 × 8   │ mode │ 01 │ 00 × 4   │ checksum │
/// └────┴────┴────┴───────┴───────┴──────────┴──────┴────┴──────────┴──────────┘
/// ```
/// The checksum covers bytes 2..19; only `12 speed ftype mode 01` are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationFrame([u8; CONFIG_FRAME_LEN]);

impl ConfigurationFrame {
    pub fn new(speed: Speed, mode: Mode, frame_type: FrameType) -> Self {
        build_configuration_frame(speed.code(), mode.code(), frame_type.code())
    }

    /// Wrap 20 received bytes. Nothing is validated.
    pub fn from_bytes(bytes: [u8; CONFIG_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CONFIG_FRAME_LEN] {
        &self.0
    }

    pub fn speed_code(&self) -> u8 {
        self.0[SPEED_OFFSET]
    }

    pub fn frame_type_code(&self) -> u8 {
        self.0[FRAME_TYPE_OFFSET]
    }

    pub fn mode_code(&self) -> u8 {
        self.0[MODE_OFFSET]
    }

    /// Whether the trailing checksum agrees with the frame body.
    ///
    /// Received frames are never rejected on this basis.
    pub fn checksum_matches(&self) -> bool {
        checksum(&self.0[2..CHECKSUM_OFFSET]) == self.0[CHECKSUM_OFFSET]
    }
}

/// Build a configuration frame from raw adapter codes.
pub fn build_configuration_frame(
    speed_code: u8,
    mode_code: u8,
    frame_type_code: u8,
) -> ConfigurationFrame {
    let mut bytes = [0u8; CONFIG_FRAME_LEN];
    bytes[0] = START_BYTE;
    bytes[1] = END_BYTE;
    bytes[2] = CONFIG_COMMAND;
    bytes[SPEED_OFFSET] = speed_code;
    bytes[FRAME_TYPE_OFFSET] = frame_type_code;
    bytes[MODE_OFFSET] = mode_code;
    bytes[TRAILER_OFFSET] = CONFIG_TRAILER;
    bytes[CHECKSUM_OFFSET] = checksum(&[
        CONFIG_COMMAND,
        speed_code,
        frame_type_code,
        mode_code,
        CONFIG_TRAILER,
    ]);
    ConfigurationFrame(bytes)
}

/// One CAN message as carried by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    pub frame_type: FrameType,
    pub id: Identifier,
    /// Payload in wire order.
    pub payload: Bytes,
}

impl DataFrame {
    /// Create a data frame, rejecting payloads longer than [`MAX_PAYLOAD`].
    pub fn new(frame_type: FrameType, id: Identifier, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        check_payload_len(payload.len())?;
        Ok(Self {
            frame_type,
            id,
            payload,
        })
    }

    /// The total wire size of this frame (overhead + payload).
    pub fn wire_size(&self) -> usize {
        DATA_FRAME_OVERHEAD + self.payload.len()
    }

    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_data_frame(self.frame_type, self.id, &self.payload, dst)
    }

    /// Payload bytes in the adapter's historical display order: last byte first.
    pub fn display_payload(&self) -> impl Iterator<Item = u8> + '_ {
        self.payload.iter().rev().copied()
    }
}

fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLong {
            len,
            max: MAX_PAYLOAD,
        });
    }
    Ok(())
}

/// Encode a data frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────┬──────┬────────┬────────┬──────────────┬────┐
/// │ AA │ info │ id lsb │ id msb │ payload 0-8  │ 55 │
/// └────┴──────┴────────┴────────┴──────────────┴────┘
/// info: 1 1 E 0 L L L L   (E = extended, LLLL = payload length)
/// ```
/// There is no checksum; the end byte is the only trailer.
pub fn encode_data_frame(
    frame_type: FrameType,
    id: Identifier,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    check_payload_len(payload.len())?;

    dst.reserve(DATA_FRAME_OVERHEAD + payload.len());
    dst.put_u8(START_BYTE);
    dst.put_u8(INFO_MARKER | frame_type.info_bit() | payload.len() as u8);
    dst.put_u8(id.lsb);
    dst.put_u8(id.msb);
    dst.put_slice(payload);
    dst.put_u8(END_BYTE);
    Ok(())
}

/// Encode a data frame into a fresh buffer.
pub fn build_data_frame(frame_type: FrameType, id: Identifier, payload: &[u8]) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_data_frame(frame_type, id, payload, &mut dst)?;
    Ok(dst.freeze())
}

/// Decode a received data frame.
///
/// Anything shorter than 6 bytes, not starting with `AA`, or without `0xC`
/// in the info byte's high nibble is [`FrameError::NotADataFrame`]. The
/// payload is everything between the identifier and the final byte.
///
/// An extended frame's info byte has `0xE` in its high nibble, so only
/// standard frames decode; extended echoes classify as [`Frame::Unknown`].
pub fn decode_data_frame(raw: &[u8]) -> Result<DataFrame> {
    if raw.len() < DATA_FRAME_OVERHEAD + 1 || raw[0] != START_BYTE || raw[1] >> 4 != 0xC {
        return Err(FrameError::NotADataFrame);
    }

    Ok(DataFrame {
        frame_type: FrameType::Standard,
        id: Identifier::new(raw[2], raw[3]),
        payload: Bytes::copy_from_slice(&raw[4..raw.len() - 1]),
    })
}

/// A received frame, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Bytes that are neither a data frame nor a configuration echo.
    Unknown(Bytes),
    /// A 20-byte configuration/command frame.
    Command(ConfigurationFrame),
    Data(DataFrame),
}

impl Frame {
    pub fn classify(raw: Bytes) -> Frame {
        if let Ok(bytes) = <[u8; CONFIG_FRAME_LEN]>::try_from(&raw[..]) {
            if bytes[0] == START_BYTE && bytes[1] == END_BYTE {
                return Frame::Command(ConfigurationFrame::from_bytes(bytes));
            }
        }

        match decode_data_frame(&raw) {
            Ok(frame) => Frame::Data(frame),
            Err(_) => Frame::Unknown(raw),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Unknown(_) => "unknown",
            Frame::Command(_) => "command",
            Frame::Data(_) => "data",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw: &[u8] = match self {
            Frame::Data(frame) => {
                write!(f, "Frame ID: {}, Data: ", frame.id)?;
                for byte in frame.display_payload() {
                    write!(f, "{byte:02x} ")?;
                }
                return Ok(());
            }
            Frame::Command(frame) => &frame.as_bytes()[..],
            Frame::Unknown(raw) => &raw[..],
        };

        f.write_str("Unknown: ")?;
        for byte in raw {
            write!(f, "{byte:02x} ")?;
        }
        Ok(())
    }
}
