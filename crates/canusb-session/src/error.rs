/// Errors that can occur while configuring the adapter or running a loop.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] canusb_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] canusb_frame::FrameError),
}

impl SessionError {
    /// Whether the loop stopped because the adapter refused a write.
    pub fn is_write_failure(&self) -> bool {
        match self {
            SessionError::Transport(err)
            | SessionError::Frame(canusb_frame::FrameError::Transport(err)) => {
                err.is_write_failure()
            }
            SessionError::Frame(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
