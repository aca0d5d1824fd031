use std::time::Duration;

use bytes::Bytes;
use canusb_transport::{ByteStream, CancelToken};
use tracing::trace;

use crate::assembler::{FrameAssembler, DEFAULT_MAX_FRAME_LEN};
use crate::error::Result;
use crate::hex::HexBytes;
use crate::TRAFFIC_TARGET;

/// How long to wait before polling again when no byte is available.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Reads complete adapter frames from a non-blocking [`ByteStream`].
///
/// Callers always get whole frames; partial data stays in the assembler
/// between polls.
pub struct FrameReader<T> {
    inner: T,
    assembler: FrameAssembler,
    poll_interval: Duration,
}

impl<T: ByteStream> FrameReader<T> {
    /// Create a reader bounded at [`DEFAULT_MAX_FRAME_LEN`] bytes per frame.
    pub fn new(inner: T) -> Self {
        Self::with_max_frame_len(inner, DEFAULT_MAX_FRAME_LEN)
    }

    pub fn with_max_frame_len(inner: T, max_frame_len: usize) -> Self {
        Self {
            inner,
            assembler: FrameAssembler::new(max_frame_len),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the idle wait between polls.
    pub fn set_poll_interval(&mut self, poll_interval: Duration) {
        self.poll_interval = poll_interval;
    }

    /// Read the next complete frame.
    ///
    /// Waits [`POLL_INTERVAL`] whenever the stream has nothing to give and
    /// checks `cancel` before every poll. Returns `Ok(None)` once cancelled,
    /// discarding any partial frame.
    pub fn read_frame(&mut self, cancel: &CancelToken) -> Result<Option<Bytes>> {
        loop {
            if cancel.is_cancelled() {
                self.assembler.reset();
                return Ok(None);
            }

            let Some(byte) = self.inner.read_nonblocking()? else {
                std::thread::sleep(self.poll_interval);
                continue;
            };

            if let Some(frame) = self.assembler.push(byte)? {
                trace!(
                    target: TRAFFIC_TARGET,
                    len = frame.len(),
                    bytes = %HexBytes(&frame),
                    "rx"
                );
                return Ok(Some(frame));
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn max_frame_len(&self) -> usize {
        self.assembler.max_len()
    }
}

#[cfg(test)]
mod tests {
    use canusb_transport::MockStream;

    use super::*;
    use crate::error::FrameError;

    fn reader(bytes: &[u8], cancel: &CancelToken) -> FrameReader<MockStream> {
        let mock = MockStream::with_rx(bytes.iter().copied()).cancel_when_drained(cancel.clone());
        let mut reader = FrameReader::new(mock);
        reader.set_poll_interval(Duration::from_millis(1));
        reader
    }

    #[test]
    fn read_single_frame() {
        let cancel = CancelToken::new();
        let mut reader = reader(&[0xAA, 0xC1, 0x45, 0x00, 0x99, 0x55], &cancel);

        let frame = reader.read_frame(&cancel).unwrap().unwrap();
        assert_eq!(frame.as_ref(), &[0xAA, 0xC1, 0x45, 0x00, 0x99, 0x55]);
    }

    #[test]
    fn read_multiple_frames() {
        let cancel = CancelToken::new();
        let mut wire = vec![0xAA, 0xC0, 0x01, 0x00, 0x55];
        wire.push(0x42);
        wire.extend([0xAA, 0xC2, 0x02, 0x00, 0x10, 0x20, 0x55]);
        let mut reader = reader(&wire, &cancel);

        let f1 = reader.read_frame(&cancel).unwrap().unwrap();
        let f2 = reader.read_frame(&cancel).unwrap().unwrap();
        let f3 = reader.read_frame(&cancel).unwrap().unwrap();

        assert_eq!(f1.len(), 5);
        assert_eq!(f2.as_ref(), &[0x42]);
        assert_eq!(f3.len(), 7);
        assert!(reader.read_frame(&cancel).unwrap().is_none());
    }

    #[test]
    fn cancelled_before_read() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut reader = reader(&[0x01], &cancel);
        assert!(reader.read_frame(&cancel).unwrap().is_none());
        assert_eq!(reader.get_ref().rx_remaining(), 1);
    }

    #[test]
    fn cancel_mid_frame_returns_none() {
        let cancel = CancelToken::new();
        let mut reader = reader(&[0xAA, 0xC8, 0x00], &cancel);
        assert!(reader.read_frame(&cancel).unwrap().is_none());
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn reads_bytes_queued_after_creation() {
        let cancel = CancelToken::new();
        let mut reader = FrameReader::new(MockStream::new());
        reader.set_poll_interval(Duration::from_millis(1));

        reader.get_mut().push_rx(&[0xAA]);
        reader.get_mut().push_rx(&[0x01]);
        let frame = reader.read_frame(&cancel).unwrap().unwrap();
        assert_eq!(frame.as_ref(), &[0xAA, 0x01]);
    }

    #[test]
    fn overflow_is_reported() {
        let cancel = CancelToken::new();
        let mut wire = vec![0xAA, 0xCF];
        wire.extend([0u8; 40]);
        let mut reader = reader(&wire, &cancel);

        let err = reader.read_frame(&cancel).unwrap_err();
        assert!(matches!(err, FrameError::FrameOverflow { max: 32 }));
        assert_eq!(reader.get_ref().rx_remaining(), 10);
    }

    #[test]
    fn transport_errors_propagate() {
        let cancel = CancelToken::new();
        let mut reader = FrameReader::new(MockStream::with_rx([0xAA]).fail_reads());
        let err = reader.read_frame(&cancel).unwrap_err();
        assert!(matches!(err, FrameError::Transport(_)));
    }

    #[test]
    fn custom_bound() {
        let reader = FrameReader::with_max_frame_len(MockStream::new(), 64);
        assert_eq!(reader.max_frame_len(), 64);
        let _inner = reader.into_inner();
    }
}
