use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::event::TransferEvent;
use crate::result::{ErrorKind, TransferFailure, TransferResult};
use crate::transmitter::Transmitter;

/// A transfer running on its own thread.
pub struct TransferHandle {
    events: mpsc::Receiver<TransferEvent>,
    thread: JoinHandle<TransferResult>,
}

impl TransferHandle {
    /// Events as they are emitted. The iterator ends once the transfer
    /// thread has finished.
    pub fn events(&self) -> mpsc::Iter<'_, TransferEvent> {
        self.events.iter()
    }

    /// Next event without blocking, if one is queued.
    pub fn try_event(&self) -> Option<TransferEvent> {
        self.events.try_recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the transfer to finish.
    pub fn join(self) -> TransferResult {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => TransferResult::Failure(TransferFailure {
                kind: ErrorKind::TransmissionError,
                message: "transfer thread panicked".to_string(),
            }),
        }
    }
}

/// Run `transmitter.send(path)` on a dedicated thread.
///
/// The caller's loop stays free to render events while file and socket I/O
/// block the worker. Each call gets its own connection.
pub fn spawn_transfer(transmitter: Transmitter, path: impl Into<PathBuf>) -> TransferHandle {
    let path = path.into();
    let (tx, rx) = mpsc::channel();
    let thread = std::thread::spawn(move || {
        let mut sink = tx;
        transmitter.send_with_events(&path, &mut sink)
    });

    TransferHandle { events: rx, thread }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmitter::TransmitterConfig;
    use stuffsend_transport::Endpoint;

    #[test]
    fn events_stream_until_terminal() {
        let tx = Transmitter::new(TransmitterConfig::new(Endpoint::new("127.0.0.1", 9)));
        let handle = spawn_transfer(tx, "/no/such/file");

        let events: Vec<TransferEvent> = handle.events().collect();
        let result = handle.join();

        assert_eq!(result.kind(), Some(ErrorKind::FileNotFound));
        assert!(matches!(events.first(), Some(TransferEvent::Started { .. })));
        assert_eq!(events.last(), Some(&TransferEvent::from(result)));
    }

    #[test]
    fn polling_drains_events_without_blocking() {
        let tx = Transmitter::new(TransmitterConfig::new(Endpoint::new("127.0.0.1", 9)));
        let handle = spawn_transfer(tx, "");

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !handle.is_finished() {
            assert!(std::time::Instant::now() < deadline, "worker should finish");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let mut polled = Vec::new();
        while let Some(event) = handle.try_event() {
            polled.push(event);
        }
        assert!(matches!(polled.first(), Some(TransferEvent::Started { .. })));
        assert!(polled.last().is_some_and(TransferEvent::is_terminal));
        assert!(handle.try_event().is_none());
        assert_eq!(handle.join().kind(), Some(ErrorKind::InvalidInput));
    }
}
