use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use stuffsend_frame::{stuff, MessageWriter};
use stuffsend_transport::{connect, Endpoint, TransportConfig};
use tracing::{debug, info, warn};

use crate::error::{Result, TransferError};
use crate::event::{EventSink, NullSink, TransferEvent};
use crate::result::{TransferFailure, TransferReport, TransferResult};

/// Transmitter configuration.
#[derive(Debug, Clone, Default)]
pub struct TransmitterConfig {
    /// Receiver address and socket timeouts.
    pub transport: TransportConfig,
}

impl TransmitterConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            transport: TransportConfig::new(endpoint),
        }
    }
}

/// Sends one file per call to a fixed receiver.
///
/// `send` blocks on file and network I/O; run it off any latency-sensitive
/// thread (see [`spawn_transfer`](crate::spawn_transfer)). Calls share no
/// state, so concurrent transfers each get their own connection.
#[derive(Debug, Clone, Default)]
pub struct Transmitter {
    config: TransmitterConfig,
}

impl Transmitter {
    pub fn new(config: TransmitterConfig) -> Self {
        Self { config }
    }

    /// Configured receiver address.
    pub fn endpoint(&self) -> &Endpoint {
        &self.config.transport.endpoint
    }

    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }

    /// Transfer the file at `path`, discarding status events.
    pub fn send(&self, path: impl AsRef<Path>) -> TransferResult {
        self.send_with_events(path, &mut NullSink)
    }

    /// Transfer the file at `path`, reporting progress to `events`.
    ///
    /// Every failure is folded into [`TransferResult::Failure`] and mirrored
    /// as a terminal [`TransferEvent::Failed`].
    pub fn send_with_events(
        &self,
        path: impl AsRef<Path>,
        events: &mut dyn EventSink,
    ) -> TransferResult {
        let path = path.as_ref();
        events.emit(TransferEvent::Started {
            path: path.display().to_string(),
        });

        let result = match self.transfer(path, events) {
            Ok(report) => {
                info!(
                    file = %report.file_name,
                    original_size = report.original_size,
                    stuffed_size = report.stuffed_size,
                    elapsed_ms = report.elapsed_millis,
                    "file sent"
                );
                TransferResult::Success(report)
            }
            Err(err) => {
                warn!(path = %path.display(), kind = %err.kind(), error = %err, "transfer failed");
                TransferResult::Failure(TransferFailure::from(&err))
            }
        };

        events.emit(TransferEvent::from(result.clone()));
        result
    }

    fn transfer(&self, path: &Path, events: &mut dyn EventSink) -> Result<TransferReport> {
        let payload = load_payload(path)?;
        let file_name = file_name_of(path);
        events.emit(TransferEvent::FileLoaded {
            file_name: file_name.clone(),
            size: payload.len(),
        });

        let frame = stuff(&payload);
        debug!(
            original_size = payload.len(),
            stuffed_size = frame.len(),
            "payload stuffed"
        );

        let stream = connect(&self.config.transport).map_err(TransferError::ConnectionFailure)?;
        events.emit(TransferEvent::Connected {
            endpoint: self.endpoint().to_string(),
        });

        // The writer owns the socket; it is closed when `writer` drops on
        // any path out of this function.
        let mut writer = MessageWriter::new(stream);
        let started = Instant::now();
        let wire_size = writer.write_message(file_name.as_bytes(), &frame)?;
        let elapsed = started.elapsed();
        writer.get_ref().shutdown_write()?;

        Ok(TransferReport {
            file_name,
            original_size: payload.len(),
            stuffed_size: frame.len(),
            wire_size,
            elapsed_millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

/// Validate `path` and read the whole file.
///
/// The file handle lives only inside this function.
fn load_payload(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(TransferError::InvalidInput);
    }

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(TransferError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(TransferError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if !metadata.is_file() {
        return Err(TransferError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let read_err = |source| TransferError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let mut payload = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut payload).map_err(read_err)?;
    Ok(payload)
}

/// Final path component, the name the receiver sees.
fn file_name_of(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::net::TcpListener;
    use std::path::PathBuf;
    use std::time::Duration;

    use stuffsend_frame::{ESC, FLAG};

    use super::*;
    use crate::result::ErrorKind;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stuffsend-tx-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    fn transmitter_for(listener: &TcpListener) -> Transmitter {
        let addr = listener.local_addr().expect("listener should have an address");
        Transmitter::new(TransmitterConfig::new(Endpoint::from(addr)))
    }

    fn unused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        listener.local_addr().expect("listener address").port()
    }

    #[test]
    fn empty_path_is_invalid_input() {
        // Nothing listens on this port, so a connection attempt would surface
        // as ConnectionFailure instead.
        let tx = Transmitter::new(TransmitterConfig::new(Endpoint::new(
            "127.0.0.1",
            unused_port(),
        )));
        let mut events: Vec<TransferEvent> = Vec::new();

        let result = tx.send_with_events("", &mut events);

        assert_eq!(result.kind(), Some(ErrorKind::InvalidInput));
        assert!(!events
            .iter()
            .any(|e| matches!(e, TransferEvent::Connected { .. })));
        assert!(events.last().is_some_and(TransferEvent::is_terminal));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let tx = Transmitter::new(TransmitterConfig::new(Endpoint::new(
            "127.0.0.1",
            unused_port(),
        )));

        let result = tx.send("/no/such/file");

        assert_eq!(result.kind(), Some(ErrorKind::FileNotFound));
    }

    #[test]
    fn directory_is_file_not_found() {
        let dir = unique_temp_dir("dir");
        let tx = Transmitter::default();

        let result = tx.send(&dir);

        assert_eq!(result.kind(), Some(ErrorKind::FileNotFound));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn refused_connection_is_connection_failure() {
        let dir = unique_temp_dir("refused");
        let file = dir.join("data.bin");
        std::fs::write(&file, b"abc").unwrap();
        let tx = Transmitter::new(TransmitterConfig::new(Endpoint::new(
            "127.0.0.1",
            unused_port(),
        )));

        let result = tx.send(&file);

        let failure = result.failure().expect("send should fail");
        assert_eq!(failure.kind, ErrorKind::ConnectionFailure);
        assert!(failure.to_string().starts_with("Transmission error:"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn wire_layout_end_to_end() {
        let dir = unique_temp_dir("wire");
        let file = dir.join("a.txt");
        std::fs::write(&file, [b'x', FLAG, b'y']).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let tx = transmitter_for(&listener);
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut wire = Vec::new();
            stream.read_to_end(&mut wire).unwrap();
            wire
        });

        let mut events: Vec<TransferEvent> = Vec::new();
        let result = tx.send_with_events(&file, &mut events);
        let wire = server.join().unwrap();

        let stuffed = [FLAG, b'x', ESC, FLAG, b'y', FLAG];
        let mut expected = Vec::new();
        expected.extend_from_slice(&5i32.to_be_bytes());
        expected.extend_from_slice(b"a.txt");
        expected.extend_from_slice(&(stuffed.len() as i32).to_be_bytes());
        expected.extend_from_slice(&stuffed);
        assert_eq!(wire, expected);

        let report = result.report().expect("send should succeed");
        assert_eq!(report.file_name, "a.txt");
        assert_eq!(report.original_size, 3);
        assert_eq!(report.stuffed_size, 3 + 2 + 1);
        assert_eq!(report.wire_size, expected.len());

        assert!(matches!(events[0], TransferEvent::Started { .. }));
        assert!(matches!(
            events[1],
            TransferEvent::FileLoaded { size: 3, .. }
        ));
        assert!(matches!(events[2], TransferEvent::Connected { .. }));
        assert_eq!(events[3], TransferEvent::Sent(report.clone()));
        assert_eq!(events.len(), 4);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_file_sends_two_flag_frame() {
        let dir = unique_temp_dir("empty");
        let file = dir.join("empty");
        std::fs::write(&file, b"").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let tx = transmitter_for(&listener);
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut wire = Vec::new();
            stream.read_to_end(&mut wire).unwrap();
            wire
        });

        let result = tx.send(&file);
        let wire = server.join().unwrap();

        assert!(result.is_success());
        assert_eq!(&wire[9..], &[0, 0, 0, 2, FLAG, FLAG]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_releases_socket() {
        let dir = unique_temp_dir("stall");
        let file = dir.join("big.bin");
        std::fs::write(&file, vec![0u8; 32 * 1024 * 1024]).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut tx = transmitter_for(&listener);
        tx.config.transport.write_timeout = Some(Duration::from_millis(200));

        let (accepted_tx, accepted_rx) = std::sync::mpsc::channel();
        let (sent_tx, sent_rx) = std::sync::mpsc::channel::<()>();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            accepted_tx.send(()).unwrap();
            // Stall until the sender gives up, then drain.
            sent_rx.recv().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(10)))
                .unwrap();
            let mut wire = Vec::new();
            // EOF (rather than a timeout) proves the sender closed the socket.
            stream.read_to_end(&mut wire).map(|_| wire.len())
        });

        let result = tx.send(&file);
        accepted_rx.recv().unwrap();
        sent_tx.send(()).unwrap();

        assert_eq!(result.kind(), Some(ErrorKind::TransmissionError));
        let drained = server.join().unwrap().expect("receiver should observe EOF");
        assert!(drained < 32 * 1024 * 1024);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn independent_transfers_share_nothing() {
        let dir = unique_temp_dir("concurrent");
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let tx = transmitter_for(&listener);

        let server = std::thread::spawn(move || {
            let mut sizes = Vec::new();
            for _ in 0..4 {
                let (mut stream, _) = listener.accept().unwrap();
                let mut wire = Vec::new();
                stream.read_to_end(&mut wire).unwrap();
                sizes.push(wire.len());
            }
            sizes
        });

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let file = dir.join(format!("f{i}"));
                std::fs::write(&file, vec![FLAG; i]).unwrap();
                let tx = tx.clone();
                std::thread::spawn(move || tx.send(&file))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_success());
        }
        let mut sizes = server.join().unwrap();
        sizes.sort_unstable();
        // 4 + 2 (name) + 4 + 2 + 2*i
        assert_eq!(sizes, vec![12, 14, 16, 18]);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
