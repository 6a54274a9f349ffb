use std::fmt;
use std::sync::mpsc;

use serde::Serialize;

use crate::result::{TransferFailure, TransferReport, TransferResult};

/// Status events emitted while a transfer runs.
///
/// Every transfer ends with exactly one `Sent` or `Failed` event carrying
/// the same data as the returned [`TransferResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransferEvent {
    /// A send was requested for `path`.
    Started { path: String },
    /// The file was read into memory.
    FileLoaded { file_name: String, size: usize },
    /// The stream connection is open.
    Connected { endpoint: String },
    /// The message was written completely.
    Sent(TransferReport),
    /// The transfer failed; nothing more will be emitted.
    Failed(TransferFailure),
}

impl TransferEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferEvent::Sent(_) | TransferEvent::Failed(_))
    }

    /// Human-readable log lines for this event.
    pub fn log_lines(&self) -> Vec<String> {
        match self {
            TransferEvent::Started { path } => vec![format!("Sending: {path}")],
            TransferEvent::FileLoaded { file_name, size } => {
                vec![format!("Selected file: {file_name}"), format!("Size: {size} bytes")]
            }
            TransferEvent::Connected { endpoint } => vec![format!("Connected to {endpoint}")],
            TransferEvent::Sent(report) => vec![
                format!("File sent: {}", report.file_name),
                format!("Original size: {} bytes", report.original_size),
                format!("Stuffed size: {} bytes", report.stuffed_size),
                format!("Transfer time: {} ms", report.elapsed_millis),
            ],
            TransferEvent::Failed(failure) => vec![failure.to_string()],
        }
    }
}

impl fmt::Display for TransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log_lines().join("\n"))
    }
}

impl From<TransferResult> for TransferEvent {
    fn from(result: TransferResult) -> Self {
        match result {
            TransferResult::Success(report) => TransferEvent::Sent(report),
            TransferResult::Failure(failure) => TransferEvent::Failed(failure),
        }
    }
}

/// Consumer of transfer events.
pub trait EventSink {
    fn emit(&mut self, event: TransferEvent);
}

impl EventSink for Vec<TransferEvent> {
    fn emit(&mut self, event: TransferEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<TransferEvent> {
    fn emit(&mut self, event: TransferEvent) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: TransferEvent) {}
}
