use bytes::BytesMut;
use canusb_transport::ByteStream;
use tracing::trace;

use crate::codec::{encode_data_frame, ConfigurationFrame, DataFrame, DATA_FRAME_OVERHEAD, MAX_PAYLOAD};
use crate::error::Result;
use crate::hex::{HexBytes, Identifier};
use crate::settings::FrameType;
use crate::TRAFFIC_TARGET;

/// Writes adapter frames to a [`ByteStream`].
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: ByteStream> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(DATA_FRAME_OVERHEAD + MAX_PAYLOAD),
        }
    }

    /// Write raw frame bytes, returning how many were written.
    pub fn send(&mut self, bytes: &[u8]) -> Result<usize> {
        trace!(
            target: TRAFFIC_TARGET,
            len = bytes.len(),
            bytes = %HexBytes(bytes),
            "tx"
        );
        Ok(self.inner.write(bytes)?)
    }

    pub fn send_configuration(&mut self, frame: &ConfigurationFrame) -> Result<usize> {
        self.send(frame.as_bytes())
    }

    pub fn send_data(&mut self, frame: &DataFrame) -> Result<usize> {
        self.send_data_parts(frame.frame_type, frame.id, &frame.payload)
    }

    /// Encode and send a data frame without building a [`DataFrame`] first.
    pub fn send_data_parts(
        &mut self,
        frame_type: FrameType,
        id: Identifier,
        payload: &[u8],
    ) -> Result<usize> {
        self.buf.clear();
        encode_data_frame(frame_type, id, payload, &mut self.buf)?;
        let written = self.inner.write(&self.buf)?;
        trace!(
            target: TRAFFIC_TARGET,
            len = written,
            bytes = %HexBytes(&self.buf),
            "tx"
        );
        Ok(written)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
