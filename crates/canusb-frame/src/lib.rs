//! Serial framing for USB-CAN adapters.
//!
//! The adapter wraps every CAN message in a small frame:
//! - `AA <info> <id lsb> <id msb> <payload 0-8> 55` for data frames
//! - a fixed 20-byte `AA 55 12 ...` frame for configuration
//!
//! This crate builds and classifies those frames, and assembles them out of
//! the adapter's byte stream one byte at a time.

pub mod assembler;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod hex;
pub mod reader;
pub mod settings;
pub mod writer;

/// `tracing` target of the per-frame `rx`/`tx` byte dumps.
pub const TRAFFIC_TARGET: &str = "canusb::traffic";

pub use assembler::{frame_is_complete, FrameAssembler, DEFAULT_MAX_FRAME_LEN};
pub use checksum::checksum;
pub use codec::{
    build_configuration_frame, build_data_frame, decode_data_frame, encode_data_frame,
    ConfigurationFrame, DataFrame, Frame, CONFIG_FRAME_LEN, DATA_FRAME_OVERHEAD, END_BYTE,
    MAX_PAYLOAD, START_BYTE,
};
pub use error::{FrameError, Result};
pub use hex::{
    decode_identifier, decode_payload, hex_value, parse_payload, DecodedPayload, HexBytes,
    Identifier,
};
pub use reader::{FrameReader, POLL_INTERVAL};
pub use settings::{FrameType, Mode, Speed};
pub use writer::FrameWriter;
