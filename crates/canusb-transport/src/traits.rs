use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};

/// The two operations the frame engine needs from an adapter connection.
pub trait ByteStream {
    /// Read at most one byte without blocking.
    ///
    /// `Ok(None)` means nothing is available right now; callers are expected
    /// to wait briefly and try again.
    fn read_nonblocking(&mut self) -> Result<Option<u8>>;

    /// Write the whole byte sequence, returning how many bytes were written.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn read_nonblocking(&mut self) -> Result<Option<u8>> {
        (**self).read_nonblocking()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        (**self).write(bytes)
    }
}

impl<S: ByteStream + ?Sized> ByteStream for Box<S> {
    fn read_nonblocking(&mut self) -> Result<Option<u8>> {
        (**self).read_nonblocking()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        (**self).write(bytes)
    }
}

/// An open serial connection to the adapter.
///
/// Opened with a zero timeout, so reads return immediately when the device
/// has nothing buffered.
pub struct SerialStream {
    port: Box<dyn serialport::SerialPort>,
    path: String,
}

impl SerialStream {
    pub(crate) fn from_port(port: Box<dyn serialport::SerialPort>, path: String) -> Self {
        Self { port, path }
    }

    /// Device path this stream was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Baud rate currently applied to the device, if the driver reports one.
    pub fn baud_rate(&self) -> Option<u32> {
        self.port.baud_rate().ok()
    }
}

impl ByteStream for SerialStream {
    fn read_nonblocking(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if is_idle(&err) => Ok(None),
            Err(err) => Err(TransportError::Read(err)),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        write_all_flush(&mut *self.port, bytes)
    }
}

// A zero-timeout port reports "nothing yet" as TimedOut rather than WouldBlock.
fn is_idle(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
    )
}

/// Write all of `bytes` and flush, retrying only interrupted calls.
///
/// On a zero-timeout port a stalled TX path shows up as `TimedOut`; that is a
/// write failure, not a reason to spin.
fn write_all_flush<W: Write + ?Sized>(port: &mut W, bytes: &[u8]) -> Result<usize> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match port.write(&bytes[offset..]) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Write(err)),
        }
    }

    loop {
        match port.flush() {
            Ok(()) => return Ok(offset),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Write(err)),
        }
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("path", &self.path)
            .finish()
    }
}
