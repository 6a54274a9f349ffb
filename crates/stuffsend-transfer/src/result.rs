use std::fmt;

use serde::Serialize;

use crate::error::TransferError;

/// Outcome taxonomy for a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No usable path was supplied; nothing was attempted.
    InvalidInput,
    /// The path does not reference an existing regular file.
    FileNotFound,
    /// The stream connection could not be established.
    ConnectionFailure,
    /// Any I/O failure while reading the file or writing the message.
    TransmissionError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::ConnectionFailure => "connection_failure",
            ErrorKind::TransmissionError => "transmission_error",
        }
    }

    /// Whether a connection was attempted. Connection failures are reported
    /// to users as transmission errors.
    pub fn is_transmission(self) -> bool {
        matches!(
            self,
            ErrorKind::ConnectionFailure | ErrorKind::TransmissionError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics for a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    /// Final path component of the sent file.
    pub file_name: String,
    /// Payload size before stuffing.
    pub original_size: usize,
    /// Stuffed frame size, delimiters included.
    pub stuffed_size: usize,
    /// Total bytes written, length prefixes and name included.
    pub wire_size: usize,
    /// Time spent writing metadata and frame.
    pub elapsed_millis: u64,
}

/// A failed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&TransferError> for TransferFailure {
    fn from(err: &TransferError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidInput => write!(f, "Please select a file before sending."),
            ErrorKind::FileNotFound => write!(f, "Error: File not found."),
            ErrorKind::ConnectionFailure | ErrorKind::TransmissionError => {
                write!(f, "Transmission error: {}", self.message)
            }
        }
    }
}

/// Terminal result of [`Transmitter::send`](crate::Transmitter::send).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferResult {
    Success(TransferReport),
    Failure(TransferFailure),
}

impl TransferResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferResult::Success(_))
    }

    pub fn report(&self) -> Option<&TransferReport> {
        match self {
            TransferResult::Success(report) => Some(report),
            TransferResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&TransferFailure> {
        match self {
            TransferResult::Success(_) => None,
            TransferResult::Failure(failure) => Some(failure),
        }
    }

    /// Error kind of a failed transfer.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.failure().map(|failure| failure.kind)
    }

    pub fn into_result(self) -> std::result::Result<TransferReport, TransferFailure> {
        match self {
            TransferResult::Success(report) => Ok(report),
            TransferResult::Failure(failure) => Err(failure),
        }
    }
}

impl From<crate::error::Result<TransferReport>> for TransferResult {
    fn from(result: crate::error::Result<TransferReport>) -> Self {
        match result {
            Ok(report) => TransferResult::Success(report),
            Err(err) => TransferResult::Failure(TransferFailure::from(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> TransferReport {
        TransferReport {
            file_name: "a.txt".to_string(),
            original_size: 3,
            stuffed_size: 6,
            wire_size: 23,
            elapsed_millis: 1,
        }
    }

    #[test]
    fn success_accessors() {
        let result = TransferResult::Success(report());
        assert!(result.is_success());
        assert_eq!(result.report().map(|r| r.stuffed_size), Some(6));
        assert!(result.failure().is_none());
        assert!(result.kind().is_none());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn failure_from_error_keeps_kind_and_message() {
        let outcome: crate::error::Result<TransferReport> = Err(TransferError::FileNotFound {
            path: "/no/such/file".into(),
        });
        let result = TransferResult::from(outcome);
        assert_eq!(result.kind(), Some(ErrorKind::FileNotFound));
        let failure = result.failure().unwrap();
        assert!(failure.message.contains("/no/such/file"));
    }

    #[test]
    fn connection_failure_reads_as_transmission_error() {
        let failure = TransferFailure {
            kind: ErrorKind::ConnectionFailure,
            message: "connection refused".to_string(),
        };
        assert!(failure.kind.is_transmission());
        assert_eq!(failure.to_string(), "Transmission error: connection refused");
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(TransferResult::Success(report())).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["file_name"], "a.txt");
        assert_eq!(json["stuffed_size"], 6);

        let json = serde_json::to_value(TransferResult::Failure(TransferFailure {
            kind: ErrorKind::InvalidInput,
            message: "no file path supplied".to_string(),
        }))
        .unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "invalid_input");
    }
}
