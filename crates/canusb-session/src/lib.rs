//! Run loops for a USB-CAN adapter.
//!
//! Configure the adapter once, then either dump every frame it receives or
//! inject data frames on a fixed pacing. Both loops run on the caller's
//! thread and stop cooperatively through a [`CancelToken`].

pub mod adapter;
pub mod dump;
pub mod error;
pub mod inject;
pub mod payload;

pub use adapter::{configure, AdapterSettings};
pub use canusb_transport::CancelToken;
pub use dump::{run_dump, DumpConfig, DumpEvent, DumpSummary};
pub use error::{Result, SessionError};
pub use inject::{
    run_inject, run_inject_with_rng, InjectConfig, InjectRequest, InjectSummary,
    DEFAULT_INJECT_GAP,
};
pub use payload::PayloadMode;
