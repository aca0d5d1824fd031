use std::time::Duration;

use canusb_frame::{decode_identifier, parse_payload, FrameType, FrameWriter, Identifier};
use canusb_transport::{ByteStream, CancelToken};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::payload::PayloadMode;

/// Pause between injected frames unless configured otherwise.
pub const DEFAULT_INJECT_GAP: Duration = Duration::from_millis(200);

/// Pacing and payload policy for the injection loop.
#[derive(Debug, Clone)]
pub struct InjectConfig {
    pub payload_mode: PayloadMode,
    /// Sleep before each frame. Zero sends back to back.
    pub gap: Duration,
    /// Stop after this many frames.
    pub count: Option<usize>,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            payload_mode: PayloadMode::Fixed,
            gap: DEFAULT_INJECT_GAP,
            count: None,
        }
    }
}

/// What to inject: frame type, identifier and the starting payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectRequest {
    pub frame_type: FrameType,
    pub id: Identifier,
    pub payload: Vec<u8>,
}

impl InjectRequest {
    /// Build a request from hex strings as typed on a command line.
    pub fn from_hex(frame_type: FrameType, id: &str, data: &str) -> Result<Self> {
        Ok(Self {
            frame_type,
            id: decode_identifier(id)?,
            payload: parse_payload(data)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InjectSummary {
    pub frames_sent: usize,
    pub bytes_sent: usize,
}

/// Send data frames until cancelled, the count is reached, or a write fails.
pub fn run_inject<T: ByteStream>(
    stream: T,
    request: &InjectRequest,
    config: &InjectConfig,
    cancel: &CancelToken,
) -> Result<InjectSummary> {
    run_inject_with_rng(stream, request, config, cancel, &mut rand::thread_rng())
}

/// [`run_inject`] with an explicit random source for [`PayloadMode::Random`].
pub fn run_inject_with_rng<T: ByteStream, R: Rng + ?Sized>(
    stream: T,
    request: &InjectRequest,
    config: &InjectConfig,
    cancel: &CancelToken,
    rng: &mut R,
) -> Result<InjectSummary> {
    let mut writer = FrameWriter::new(stream);
    let mut payload = request.payload.clone();
    let mut summary = InjectSummary::default();

    info!(
        id = %request.id,
        len = payload.len(),
        mode = ?config.payload_mode,
        gap_ms = config.gap.as_millis() as u64,
        "injecting"
    );

    while !cancel.is_cancelled() {
        if config.count.is_some_and(|limit| summary.frames_sent >= limit) {
            break;
        }

        if !config.gap.is_zero() {
            std::thread::sleep(config.gap);
        }

        config.payload_mode.advance(&mut payload, rng);

        let written = writer
            .send_data_parts(request.frame_type, request.id, &payload)
            .inspect_err(|err| debug!(%err, sent = summary.frames_sent, "injection stopped"))?;
        summary.frames_sent += 1;
        summary.bytes_sent += written;
    }

    info!(frames = summary.frames_sent, "injection finished");
    Ok(summary)
}
