//! Adapter configuration values: bus speed, bus mode and frame type.

use crate::error::{FrameError, Result};

/// CAN bus bitrates the adapter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speed {
    Kbps1000,
    Kbps800,
    Kbps500,
    Kbps400,
    Kbps250,
    Kbps200,
    Kbps125,
    Kbps100,
    Kbps50,
    Kbps20,
    Kbps10,
    Kbps5,
}

impl Speed {
    /// Every supported speed, fastest first.
    pub const ALL: [Speed; 12] = [
        Speed::Kbps1000,
        Speed::Kbps800,
        Speed::Kbps500,
        Speed::Kbps400,
        Speed::Kbps250,
        Speed::Kbps200,
        Speed::Kbps125,
        Speed::Kbps100,
        Speed::Kbps50,
        Speed::Kbps20,
        Speed::Kbps10,
        Speed::Kbps5,
    ];

    /// Map a bitrate in bits per second to a supported speed.
    pub fn from_bps(bps: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|speed| speed.bps() == bps)
            .ok_or(FrameError::InvalidSpeed(bps))
    }

    pub fn bps(self) -> u32 {
        match self {
            Speed::Kbps1000 => 1_000_000,
            Speed::Kbps800 => 800_000,
            Speed::Kbps500 => 500_000,
            Speed::Kbps400 => 400_000,
            Speed::Kbps250 => 250_000,
            Speed::Kbps200 => 200_000,
            Speed::Kbps125 => 125_000,
            Speed::Kbps100 => 100_000,
            Speed::Kbps50 => 50_000,
            Speed::Kbps20 => 20_000,
            Speed::Kbps10 => 10_000,
            Speed::Kbps5 => 5_000,
        }
    }

    /// Adapter speed code (`0x01` for 1 Mbps through `0x0C` for 5 kbps).
    pub fn code(self) -> u8 {
        match self {
            Speed::Kbps1000 => 0x01,
            Speed::Kbps800 => 0x02,
            Speed::Kbps500 => 0x03,
            Speed::Kbps400 => 0x04,
            Speed::Kbps250 => 0x05,
            Speed::Kbps200 => 0x06,
            Speed::Kbps125 => 0x07,
            Speed::Kbps100 => 0x08,
            Speed::Kbps50 => 0x09,
            Speed::Kbps20 => 0x0A,
            Speed::Kbps10 => 0x0B,
            Speed::Kbps5 => 0x0C,
        }
    }
}

/// Bus operating mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Loopback,
    Silent,
    LoopbackSilent,
}

impl Mode {
    pub fn code(self) -> u8 {
        match self {
            Mode::Normal => 0x00,
            Mode::Loopback => 0x01,
            Mode::Silent => 0x02,
            Mode::LoopbackSilent => 0x03,
        }
    }
}

/// CAN identifier format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// 11-bit identifiers.
    #[default]
    Standard,
    /// 29-bit identifiers.
    Extended,
}

impl FrameType {
    /// Code used in the configuration frame.
    pub fn code(self) -> u8 {
        match self {
            FrameType::Standard => 0x01,
            FrameType::Extended => 0x02,
        }
    }

    /// Bit set in a data frame's info byte.
    pub fn info_bit(self) -> u8 {
        match self {
            FrameType::Standard => 0x00,
            FrameType::Extended => 0x20,
        }
    }
}
