//! Scripted in-memory stream for exercising the frame engine without hardware.

use std::collections::VecDeque;

use crate::cancel::CancelToken;
use crate::error::{Result, TransportError};
use crate::traits::ByteStream;

/// In-memory [`ByteStream`] with a scripted receive queue and a capture of
/// everything written.
#[derive(Debug, Default)]
pub struct MockStream {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    writes: Vec<Vec<u8>>,
    fail_writes_after: Option<usize>,
    fail_reads: bool,
    cancel_when_drained: Option<CancelToken>,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stream that will hand out `bytes` one at a time.
    pub fn with_rx(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rx: bytes.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue more bytes for reading.
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Cancel `token` the first time a read finds the queue empty.
    pub fn cancel_when_drained(mut self, token: CancelToken) -> Self {
        self.cancel_when_drained = Some(token);
        self
    }

    /// Accept `count` writes, then fail every write after that.
    pub fn fail_writes_after(mut self, count: usize) -> Self {
        self.fail_writes_after = Some(count);
        self
    }

    /// Make every read fail with an I/O error.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Every byte written so far, concatenated.
    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    /// Each write call's bytes, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Bytes still waiting to be read.
    pub fn rx_remaining(&self) -> usize {
        self.rx.len()
    }
}

impl ByteStream for MockStream {
    fn read_nonblocking(&mut self) -> Result<Option<u8>> {
        if self.fail_reads {
            return Err(TransportError::Read(std::io::Error::other(
                "mock read failure",
            )));
        }
        let byte = self.rx.pop_front();
        if byte.is_none() {
            if let Some(token) = &self.cancel_when_drained {
                token.cancel();
            }
        }
        Ok(byte)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if let Some(limit) = self.fail_writes_after {
            if self.writes.len() >= limit {
                return Err(TransportError::Write(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "mock write failure",
                )));
            }
        }
        self.tx.extend_from_slice(bytes);
        self.writes.push(bytes.to_vec());
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drained_queue_cancels_token() {
        let token = CancelToken::new();
        let mut mock = MockStream::with_rx([1]).cancel_when_drained(token.clone());

        assert_eq!(mock.read_nonblocking().unwrap(), Some(1));
        assert!(!token.is_cancelled());
        assert_eq!(mock.read_nonblocking().unwrap(), None);
        assert!(token.is_cancelled());
    }

    #[test]
    fn writes_fail_after_limit() {
        let mut mock = MockStream::new().fail_writes_after(1);
        assert_eq!(mock.write(&[0xAA]).unwrap(), 1);

        let err = mock.write(&[0xBB]).unwrap_err();
        assert!(err.is_write_failure());
        assert_eq!(mock.writes().len(), 1);
        assert_eq!(mock.tx(), &[0xAA]);
    }

    #[test]
    fn failing_reads_surface_errors() {
        let mut mock = MockStream::with_rx([1]).fail_reads();
        assert!(matches!(
            mock.read_nonblocking(),
            Err(TransportError::Read(_))
        ));
    }
}
