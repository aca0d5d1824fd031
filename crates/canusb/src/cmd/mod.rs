use std::path::PathBuf;

use canusb_frame::{FrameType, Mode, Speed, DEFAULT_MAX_FRAME_LEN};
use canusb_session::{configure, AdapterSettings, CancelToken, PayloadMode};
use canusb_transport::{SerialDevice, SerialStream, DEFAULT_BAUD_RATE};
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{frame_error, session_error, transport_error, CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod dump;
pub mod inject;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure the adapter and print every frame it receives.
    Dump(DumpArgs),
    /// Configure the adapter and send data frames periodically.
    Inject(InjectArgs),
    /// List serial devices.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Dump(args) => dump::run(args, format),
        Command::Inject(args) => inject::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum BusMode {
    Normal,
    Loopback,
    Silent,
    LoopbackSilent,
}

impl From<BusMode> for Mode {
    fn from(mode: BusMode) -> Self {
        match mode {
            BusMode::Normal => Mode::Normal,
            BusMode::Loopback => Mode::Loopback,
            BusMode::Silent => Mode::Silent,
            BusMode::LoopbackSilent => Mode::LoopbackSilent,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FrameTypeArg {
    Standard,
    Extended,
}

impl From<FrameTypeArg> for FrameType {
    fn from(frame_type: FrameTypeArg) -> Self {
        match frame_type {
            FrameTypeArg::Standard => FrameType::Standard,
            FrameTypeArg::Extended => FrameType::Extended,
        }
    }
}

/// Connection and bus settings shared by `dump` and `inject`.
#[derive(Args, Debug)]
pub struct AdapterArgs {
    /// Serial device of the adapter.
    #[arg(long, short = 'd', env = "CANUSB_DEVICE")]
    pub device: PathBuf,
    /// CAN bus speed in bps.
    #[arg(long, short = 's', default_value_t = 500_000)]
    pub speed: u32,
    /// Serial baud rate.
    #[arg(long, short = 'b', default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Bus mode.
    #[arg(long, value_enum, default_value = "normal")]
    pub bus_mode: BusMode,
    /// Identifier format.
    #[arg(long, value_enum, default_value = "standard")]
    pub frame_type: FrameTypeArg,
}

impl AdapterArgs {
    /// Validate the bus settings before touching the device.
    pub fn settings(&self) -> CliResult<AdapterSettings> {
        let speed = Speed::from_bps(self.speed).map_err(|err| frame_error("invalid --speed", err))?;
        Ok(AdapterSettings {
            speed,
            mode: self.bus_mode.into(),
            frame_type: self.frame_type.into(),
        })
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub adapter: AdapterArgs,
    /// Exit after receiving N frames.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
    /// Give up on a frame that is still incomplete after this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_LEN)]
    pub max_frame_len: usize,
}

#[derive(Args, Debug)]
pub struct InjectArgs {
    #[command(flatten)]
    pub adapter: AdapterArgs,
    /// Identifier to inject, 1-3 hex digits.
    #[arg(long, short = 'i')]
    pub id: String,
    /// Payload to inject as hex; non-hex characters are ignored.
    #[arg(long, short = 'j')]
    pub data: String,
    /// Milliseconds to sleep before each frame.
    #[arg(long, short = 'g', default_value_t = 200)]
    pub gap: u64,
    /// Payload mode: random (0), incremental (1) or fixed (2).
    #[arg(long, short = 'm', default_value = "fixed", value_parser = parse_payload_mode)]
    pub payload_mode: PayloadMode,
    /// Exit after sending N frames.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_payload_mode(value: &str) -> Result<PayloadMode, String> {
    if let Ok(code) = value.parse::<u8>() {
        return PayloadMode::from_code(code)
            .ok_or_else(|| format!("unknown payload mode code {code} (expected 0, 1 or 2)"));
    }
    match value.to_ascii_lowercase().as_str() {
        "random" => Ok(PayloadMode::Random),
        "incremental" => Ok(PayloadMode::Incremental),
        "fixed" => Ok(PayloadMode::Fixed),
        other => Err(format!(
            "unknown payload mode {other:?} (expected random, incremental or fixed)"
        )),
    }
}

/// Open the device and push the configuration frame.
pub fn open_adapter(args: &AdapterArgs, settings: &AdapterSettings) -> CliResult<SerialStream> {
    let mut stream = SerialDevice::open(&args.device, args.baud)
        .map_err(|err| transport_error("open failed", err))?;
    configure(&mut stream, settings).map_err(|err| session_error("configure failed", err))?;
    Ok(stream)
}

/// Cancel `token` on Ctrl-C, SIGTERM or SIGHUP.
pub fn install_ctrlc_handler(token: CancelToken) -> CliResult<()> {
    ctrlc::set_handler(move || token.cancel())
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn payload_mode_names_and_codes() {
        assert_eq!(parse_payload_mode("0").unwrap(), PayloadMode::Random);
        assert_eq!(parse_payload_mode("incremental").unwrap(), PayloadMode::Incremental);
        assert_eq!(parse_payload_mode("FIXED").unwrap(), PayloadMode::Fixed);
        assert!(parse_payload_mode("3").is_err());
        assert!(parse_payload_mode("sometimes").is_err());
    }

    #[test]
    fn settings_reject_unknown_speed() {
        let args = AdapterArgs {
            device: PathBuf::from("/dev/null"),
            speed: 42,
            baud: DEFAULT_BAUD_RATE,
            bus_mode: BusMode::Normal,
            frame_type: FrameTypeArg::Standard,
        };
        let err = args.settings().unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn settings_map_bus_options() {
        let args = AdapterArgs {
            device: PathBuf::from("/dev/null"),
            speed: 250_000,
            baud: DEFAULT_BAUD_RATE,
            bus_mode: BusMode::LoopbackSilent,
            frame_type: FrameTypeArg::Extended,
        };
        let settings = args.settings().unwrap();
        assert_eq!(settings.speed, Speed::Kbps250);
        assert_eq!(settings.mode, Mode::LoopbackSilent);
        assert_eq!(settings.frame_type, FrameType::Extended);
    }
}
