use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::SerialStream;

/// Default TTY baud rate for the adapter's serial side.
pub const DEFAULT_BAUD_RATE: u32 = 2_000_000;

/// Serial device access for the adapter.
pub struct SerialDevice;

impl SerialDevice {
    /// Open the adapter's serial device at `baud_rate`.
    ///
    /// The port is opened with a zero timeout so that
    /// [`ByteStream::read_nonblocking`](crate::ByteStream::read_nonblocking)
    /// never blocks.
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> Result<SerialStream> {
        let path = path.as_ref();
        let name = path.to_string_lossy().into_owned();

        debug!(path = %name, baud_rate, "opening serial device");
        let port = serialport::new(name.as_str(), baud_rate)
            .timeout(Duration::ZERO)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %name, baud_rate, "serial device open");
        Ok(SerialStream::from_port(port, name))
    }
}

/// A serial device found on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub name: String,
    /// Short description of the bus the device sits on.
    pub kind: String,
}

/// List serial devices present on the host.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            kind: describe(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn describe(port_type: &serialport::SerialPortType) -> String {
    match port_type {
        serialport::SerialPortType::UsbPort(usb) => {
            let mut out = format!("usb {:04x}:{:04x}", usb.vid, usb.pid);
            if let Some(product) = &usb.product {
                out.push(' ');
                out.push_str(product);
            }
            out
        }
        serialport::SerialPortType::PciPort => "pci".to_string(),
        serialport::SerialPortType::BluetoothPort => "bluetooth".to_string(),
        serialport::SerialPortType::Unknown => "unknown".to_string(),
    }
}
