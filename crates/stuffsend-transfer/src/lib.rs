//! Single-file transfer over the stuffsend protocol.
//!
//! This is the "just works" layer. [`Transmitter::send`] reads a file,
//! stuffs it, writes it to the configured receiver and hands back a
//! [`TransferResult`]. Failures are values, never panics, and every call
//! owns its own connection.
//!
//! [`Receiver`] implements the other end of the wire contract.

pub mod error;
pub mod event;
pub mod receiver;
pub mod result;
pub mod transmitter;
pub mod worker;

pub use error::{Result, TransferError};
pub use event::{EventSink, NullSink, TransferEvent};
pub use receiver::{receive_message, ReceivedFile, Receiver};
pub use result::{ErrorKind, TransferFailure, TransferReport, TransferResult};
pub use transmitter::{Transmitter, TransmitterConfig};
pub use worker::{spawn_transfer, TransferHandle};
