use canusb_frame::TRAFFIC_TARGET;
use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Everything at `level`, plus the raw rx/tx byte dumps when `traffic` is set.
///
/// The traffic target is silenced otherwise so that `--log-level trace`
/// alone does not flood stderr with every serial byte.
fn log_filter(level: LogLevel, traffic: bool) -> Targets {
    let traffic_level = if traffic {
        LevelFilter::TRACE
    } else {
        LevelFilter::OFF
    };
    Targets::new()
        .with_default(level.as_filter())
        .with_target(TRAFFIC_TARGET, traffic_level)
}

/// Install the stderr subscriber.
pub fn init_logging(format: LogFormat, level: LogLevel, traffic: bool) {
    let filter = log_filter(level, traffic);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(traffic);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init(),
    };
}
