//! Byte-stuffed single-file transfer over TCP.
//!
//! stuffsend sends one file per connection to a fixed receiver. The payload
//! is wrapped in a FLAG/ESC byte-stuffed frame and preceded by the file
//! name, each with a big-endian length prefix.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP endpoint configuration, connect and listen
//! - [`frame`]: Byte stuffing and the wire message codec
//! - [`transfer`]: Transmitter, receiver, status events and results

/// Re-export transport types.
pub mod transport {
    pub use stuffsend_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use stuffsend_frame::*;
}

/// Re-export transfer types.
pub mod transfer {
    pub use stuffsend_transfer::*;
}

pub use stuffsend_frame::{stuff, unstuff, StuffedFrame, ESC, FLAG};
pub use stuffsend_transfer::{
    spawn_transfer, ErrorKind, TransferEvent, TransferResult, Transmitter, TransmitterConfig,
};
pub use stuffsend_transport::Endpoint;
