use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use canusb_frame::{Frame, FrameError, FrameReader, DEFAULT_MAX_FRAME_LEN};
use canusb_transport::{ByteStream, CancelToken};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Receive-side limits for the dump loop.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Bytes buffered before an unfinished frame is abandoned.
    pub max_frame_len: usize,
    /// Stop after this many frames.
    pub count: Option<usize>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            count: None,
        }
    }
}

/// One iteration's outcome, stamped at receipt.
#[derive(Debug)]
pub enum DumpEvent {
    Frame {
        received_at: SystemTime,
        frame: Frame,
    },
    /// The assembler overflowed; the loop keeps going.
    ReceiveError {
        received_at: SystemTime,
        error: FrameError,
    },
}

impl DumpEvent {
    pub fn received_at(&self) -> SystemTime {
        match self {
            DumpEvent::Frame { received_at, .. } | DumpEvent::ReceiveError { received_at, .. } => {
                *received_at
            }
        }
    }

    /// Seconds since the Unix epoch, with sub-second precision.
    pub fn unix_timestamp(&self) -> f64 {
        self.received_at()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// The dump line format: `<unix time> Frame ID: ...` or `<unix time> Unknown: ...`.
impl fmt::Display for DumpEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ", self.unix_timestamp())?;
        match self {
            DumpEvent::Frame { frame, .. } => write!(f, "{frame}"),
            DumpEvent::ReceiveError { .. } => f.write_str("Frame receive error!"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DumpSummary {
    pub frames: usize,
    pub receive_errors: usize,
}

/// Receive, classify and report frames until cancelled or `count` frames arrive.
///
/// Overflows are reported through `on_event` and the loop continues.
/// Transport failures end the loop with an error.
pub fn run_dump<T, F>(
    stream: T,
    config: &DumpConfig,
    cancel: &CancelToken,
    mut on_event: F,
) -> Result<DumpSummary>
where
    T: ByteStream,
    F: FnMut(&DumpEvent),
{
    let mut reader = FrameReader::with_max_frame_len(stream, config.max_frame_len);
    let mut summary = DumpSummary::default();

    info!(max_frame_len = config.max_frame_len, count = ?config.count, "dumping frames");

    loop {
        if config.count.is_some_and(|limit| summary.frames >= limit) {
            break;
        }

        let outcome = reader.read_frame(cancel);
        let received_at = SystemTime::now();

        let event = match outcome {
            Ok(None) => break,
            Ok(Some(raw)) => {
                summary.frames += 1;
                let frame = Frame::classify(raw);
                if let Frame::Command(config_frame) = &frame {
                    debug!(checksum_ok = config_frame.checksum_matches(), "configuration frame echo");
                }
                DumpEvent::Frame { received_at, frame }
            }
            Err(error @ FrameError::FrameOverflow { .. }) => {
                summary.receive_errors += 1;
                warn!(%error, "frame receive error");
                DumpEvent::ReceiveError { received_at, error }
            }
            Err(error) => return Err(error.into()),
        };

        on_event(&event);
    }

    info!(
        frames = summary.frames,
        receive_errors = summary.receive_errors,
        "dump finished"
    );
    Ok(summary)
}
