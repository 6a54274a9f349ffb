use std::fmt;
use std::io;

use stuffsend_transfer::{ErrorKind, TransferError, TransferFailure};
use stuffsend_transport::TransportError;

// Exit code constants aligned with sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const NO_INPUT: i32 = 66;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: &io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => NO_INPUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrInUse => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: &TransportError) -> CliError {
    let mut cli = io_error(context, err.io_source());
    if cli.code == INTERNAL {
        cli.code = TRANSPORT_ERROR;
    }
    cli.message = format!("{context}: {err}");
    cli
}

pub fn transfer_error(context: &str, err: &TransferError) -> CliError {
    match err {
        TransferError::ConnectionFailure(source) | TransferError::Transport(source) => {
            transport_error(context, source)
        }
        TransferError::Frame(stuffsend_frame::FrameError::Io(source)) => io_error(context, source),
        TransferError::Frame(_) | TransferError::InvalidFileName { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        TransferError::Read { source, .. } | TransferError::Save { source, .. } => {
            io_error(context, source)
        }
        TransferError::InvalidInput => CliError::new(USAGE, format!("{context}: {err}")),
        TransferError::FileNotFound { .. } => CliError::new(NO_INPUT, format!("{context}: {err}")),
    }
}

/// Exit code for a failed send.
pub fn failure_code(failure: &TransferFailure) -> i32 {
    match failure.kind {
        ErrorKind::InvalidInput => USAGE,
        ErrorKind::FileNotFound => NO_INPUT,
        ErrorKind::ConnectionFailure => TRANSPORT_ERROR,
        ErrorKind::TransmissionError => FAILURE,
    }
}
