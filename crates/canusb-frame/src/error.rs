use canusb_transport::TransportError;

/// Errors that can occur while encoding, decoding or assembling frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The bitrate has no adapter speed code.
    #[error("unsupported CAN bus speed: {0} bps")]
    InvalidSpeed(u32),

    /// The identifier is not 1-3 hex digits.
    #[error("invalid CAN identifier {0:?} (expected 1-3 hex digits)")]
    InvalidIdentifier(String),

    /// The payload string decoded to nothing usable.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// More payload bytes than a CAN data frame can carry.
    #[error("payload too long ({len} bytes, max {max})")]
    PayloadTooLong { len: usize, max: usize },

    /// The assembler buffer filled up without forming a complete frame.
    #[error("frame overflow: no complete frame within {max} bytes")]
    FrameOverflow { max: usize },

    /// The raw bytes are not a data frame.
    #[error("not a data frame")]
    NotADataFrame,

    /// The underlying transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
