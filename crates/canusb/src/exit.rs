use std::fmt;

use canusb_frame::FrameError;
use canusb_session::SessionError;
use canusb_transport::TransportError;

// Process exit codes. USAGE matches sysexits EX_USAGE.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = if err.is_permission_denied() {
        PERMISSION_DENIED
    } else {
        match err {
            TransportError::Open { .. }
            | TransportError::Read(_)
            | TransportError::Write(_)
            | TransportError::Closed => TRANSPORT_ERROR,
            TransportError::Enumerate(_) => FAILURE,
        }
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::InvalidSpeed(_)
        | FrameError::InvalidIdentifier(_)
        | FrameError::InvalidPayload(_)
        | FrameError::PayloadTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::FrameOverflow { .. } | FrameError::NotADataFrame => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::Frame(err) => frame_error(context, err),
    }
}
