use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{CONFIG_FRAME_LEN, DATA_FRAME_OVERHEAD, END_BYTE, MAX_PAYLOAD, START_BYTE};
use crate::error::{FrameError, Result};

/// Largest frame the receive path buffers before giving up.
pub const DEFAULT_MAX_FRAME_LEN: usize = 32;

/// Whether `buf` holds one complete adapter frame.
///
/// - a first byte other than `AA` is passed through on its own, so the
///   stream resynchronizes one byte at a time
/// - `AA 55` starts a 20-byte configuration frame
/// - `AA Cx` starts a data frame of `x + 5` bytes
/// - any other second byte ends a 2-byte frame
///
/// Data length codes 9-15 have no defined length; such a buffer never
/// completes and can only overflow.
pub fn frame_is_complete(buf: &[u8]) -> bool {
    match buf {
        [] => false,
        [first, ..] if *first != START_BYTE => true,
        [_] => false,
        [_, second, ..] if *second == END_BYTE => buf.len() >= CONFIG_FRAME_LEN,
        [_, info, ..] if *info >> 4 == 0xC => {
            let dlc = usize::from(*info & 0x0F);
            dlc <= MAX_PAYLOAD && buf.len() >= dlc + DATA_FRAME_OVERHEAD
        }
        _ => true,
    }
}

/// Byte-at-a-time frame assembly with a bounded buffer.
#[derive(Debug)]
pub struct FrameAssembler {
    buf: BytesMut,
    max_len: usize,
}

impl FrameAssembler {
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(max_len),
            max_len,
        }
    }

    /// Append one byte.
    ///
    /// Returns the frame once it is complete. If the buffer reaches
    /// `max_len` first, it is discarded and [`FrameError::FrameOverflow`]
    /// is returned.
    pub fn push(&mut self, byte: u8) -> Result<Option<Bytes>> {
        self.buf.put_u8(byte);

        if frame_is_complete(&self.buf) {
            return Ok(Some(self.buf.split().freeze()));
        }

        if self.buf.len() >= self.max_len {
            self.buf.clear();
            return Err(FrameError::FrameOverflow { max: self.max_len });
        }

        Ok(None)
    }

    /// Drop any partially assembled frame.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Bytes held for the frame in progress.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_LEN)
    }
}
