//! Dump and inject CAN traffic through serial USB-CAN adapters.
//!
//! # Crate Structure
//!
//! - [`transport`]: Serial byte stream, cancellation token
//! - [`frame`]: Adapter frame codec and stream assembly
//! - [`session`]: Adapter configuration, dump and injection loops

/// Re-export transport types.
pub mod transport {
    pub use canusb_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use canusb_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use canusb_session::*;
}
