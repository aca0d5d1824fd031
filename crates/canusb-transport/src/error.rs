use std::path::PathBuf;

/// Errors that can occur in adapter transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to list the serial devices present on the host.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// Reading from the device failed.
    #[error("transport read failed: {0}")]
    Read(std::io::Error),

    /// Writing to the device failed.
    #[error("transport write failed: {0}")]
    Write(std::io::Error),

    /// The device accepted zero bytes; it is gone or shut down.
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// Whether this error came from the write side of the stream.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, TransportError::Write(_) | TransportError::Closed)
    }

    /// Whether the OS refused access to the device.
    pub fn is_permission_denied(&self) -> bool {
        use std::io::ErrorKind;

        match self {
            TransportError::Open { source, .. } | TransportError::Enumerate(source) => {
                matches!(
                    source.kind(),
                    serialport::ErrorKind::Io(ErrorKind::PermissionDenied)
                )
            }
            TransportError::Read(err) | TransportError::Write(err) => {
                err.kind() == ErrorKind::PermissionDenied
            }
            TransportError::Closed => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
