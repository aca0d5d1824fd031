use canusb_frame::{ConfigurationFrame, FrameType, FrameWriter, Mode, Speed};
use canusb_transport::ByteStream;
use tracing::info;

use crate::error::Result;

/// Bus settings pushed to the adapter before a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSettings {
    pub speed: Speed,
    pub mode: Mode,
    pub frame_type: FrameType,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            speed: Speed::Kbps500,
            mode: Mode::Normal,
            frame_type: FrameType::Standard,
        }
    }
}

impl AdapterSettings {
    pub fn configuration_frame(&self) -> ConfigurationFrame {
        ConfigurationFrame::new(self.speed, self.mode, self.frame_type)
    }
}

/// Send one configuration frame carrying `settings`.
pub fn configure<T: ByteStream>(stream: T, settings: &AdapterSettings) -> Result<()> {
    let frame = settings.configuration_frame();
    FrameWriter::new(stream).send_configuration(&frame)?;
    info!(
        speed_bps = settings.speed.bps(),
        mode = ?settings.mode,
        frame_type = ?settings.frame_type,
        "adapter configured"
    );
    Ok(())
}
