/// Errors that can occur during stuffing, unstuffing and message encoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame does not start and end with a FLAG byte.
    #[error("frame is not FLAG-delimited")]
    MissingDelimiter,

    /// An unescaped FLAG byte appeared inside the frame body.
    #[error("unescaped FLAG at offset {offset}")]
    UnexpectedFlag { offset: usize },

    /// The frame body ends with an ESC that has no following byte.
    #[error("dangling ESC before closing FLAG")]
    DanglingEscape,

    /// A length prefix on the wire was negative.
    #[error("negative {field} length ({value})")]
    NegativeLength { field: &'static str, value: i32 },

    /// A length prefix exceeds the configured maximum.
    #[error("{field} too large ({size} bytes, max {max})")]
    TooLarge {
        field: &'static str,
        size: usize,
        max: usize,
    },

    /// A length does not fit in the signed 32-bit wire prefix.
    #[error("{field} length {size} does not fit in a signed 32-bit prefix")]
    LengthOverflow { field: &'static str, size: usize },

    /// An I/O error occurred while reading or writing messages.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete message was transferred.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
