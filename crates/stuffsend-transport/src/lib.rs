//! Blocking TCP transport for stuffsend.
//!
//! The receiver address is static configuration ([`Endpoint`]), never
//! negotiated. Every transfer opens its own connection and owns the
//! resulting [`TransferStream`] for its whole lifetime.
//!
//! This is the lowest layer of stuffsend. Everything else builds on top of
//! the [`TransferStream`] type provided here.

pub mod endpoint;
pub mod error;
pub mod stream;
pub mod tcp;

pub use endpoint::{Endpoint, TransportConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use error::{Result, TransportError};
pub use stream::TransferStream;
pub use tcp::{connect, TcpTransferListener};
