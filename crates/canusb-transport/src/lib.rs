//! Byte-stream transport for USB-CAN adapters.
//!
//! The adapter shows up as a serial device. Everything above this crate only
//! needs two operations from it:
//! - read whatever single byte is available, without blocking
//! - write a byte sequence, reporting how many bytes went out
//!
//! This is the lowest layer of canusb. The frame engine and the run loops
//! are written against the [`ByteStream`] trait defined here, and observe a
//! shared [`CancelToken`] for cooperative shutdown.

pub mod cancel;
pub mod error;
pub mod serial;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cancel::CancelToken;
pub use error::{Result, TransportError};
pub use serial::{available_ports, PortInfo, SerialDevice, DEFAULT_BAUD_RATE};
pub use traits::{ByteStream, SerialStream};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockStream;
