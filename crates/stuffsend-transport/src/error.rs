/// Errors that can occur in stream transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint host could not be resolved to any socket address.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        source: std::io::Error,
    },

    /// Failed to connect to the configured endpoint.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    /// Failed to bind a listening socket.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying I/O error.
    pub fn io_source(&self) -> &std::io::Error {
        match self {
            TransportError::Resolve { source, .. }
            | TransportError::Connect { source, .. }
            | TransportError::Bind { source, .. }
            | TransportError::Accept(source)
            | TransportError::Io(source) => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
