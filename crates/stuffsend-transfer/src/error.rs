use std::path::PathBuf;

use crate::result::ErrorKind;

/// Errors that can occur while sending or receiving a file.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// No file path was supplied.
    #[error("no file path supplied")]
    InvalidInput,

    /// The path does not name an existing regular file.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The receiver could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailure(#[source] stuffsend_transport::TransportError),

    /// Reading the file failed after it passed the existence check.
    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Transport error on an established stream.
    #[error("transport error: {0}")]
    Transport(#[from] stuffsend_transport::TransportError),

    /// Frame encoding, decoding or stream I/O failed.
    #[error("frame error: {0}")]
    Frame(#[from] stuffsend_frame::FrameError),

    /// A received file name cannot be used as a local file name.
    #[error("invalid file name {name:?}")]
    InvalidFileName { name: String },

    /// Writing a received file to disk failed.
    #[error("failed saving {}: {source}", path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TransferError {
    /// Collapse the error into the outcome taxonomy reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidInput | TransferError::InvalidFileName { .. } => {
                ErrorKind::InvalidInput
            }
            TransferError::FileNotFound { .. } => ErrorKind::FileNotFound,
            TransferError::ConnectionFailure(_) => ErrorKind::ConnectionFailure,
            TransferError::Read { .. }
            | TransferError::Transport(_)
            | TransferError::Frame(_)
            | TransferError::Save { .. } => ErrorKind::TransmissionError,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
