use std::io::Read;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use stuffsend_frame::{FrameConfig, MessageReader, TransferMessage};
use stuffsend_transport::TcpTransferListener;
use tracing::{debug, info, warn};

use crate::error::{Result, TransferError};

/// A file recovered from one transfer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedFile {
    /// Name as sent, decoded lossily from the wire bytes.
    pub file_name: String,
    /// Unstuffed file content.
    pub payload: Vec<u8>,
    /// Size of the frame as it travelled, delimiters included.
    pub stuffed_size: usize,
}

impl ReceivedFile {
    /// Rebuild the file from a decoded message, rejecting malformed frames.
    pub fn from_message(msg: &TransferMessage) -> Result<Self> {
        let payload = msg.payload()?;
        Ok(Self {
            file_name: String::from_utf8_lossy(&msg.name).into_owned(),
            payload,
            stuffed_size: msg.frame.len(),
        })
    }

    /// The received name reduced to a single safe path component.
    pub fn safe_file_name(&self) -> Result<&str> {
        let invalid = || TransferError::InvalidFileName {
            name: self.file_name.clone(),
        };
        let name = Path::new(&self.file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(invalid)?;
        // Only a plain name survives; anything that still carries a root,
        // prefix or parent reference is refused.
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(name),
            _ => Err(invalid()),
        }
    }

    /// Write the payload into `dir` under its safe file name.
    pub fn save_into(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.safe_file_name()?);
        std::fs::write(&path, &self.payload).map_err(|source| TransferError::Save {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), size = self.payload.len(), "saved received file");
        Ok(path)
    }
}

/// Read one message from `reader` and unstuff it.
pub fn receive_message<R: Read>(reader: &mut MessageReader<R>) -> Result<ReceivedFile> {
    let msg = reader.read_message()?;
    ReceivedFile::from_message(&msg)
}

/// Accepts connections and turns each one into a [`ReceivedFile`].
///
/// Connections are handled one at a time; each carries exactly one file.
pub struct Receiver {
    listener: TcpTransferListener,
    frame_config: FrameConfig,
    received: AtomicU64,
}

impl Receiver {
    /// Bind a listening socket (`127.0.0.1:0` picks an ephemeral port).
    pub fn bind(addr: impl ToSocketAddrs + std::fmt::Debug) -> Result<Self> {
        let listener = TcpTransferListener::bind(addr)?;
        Ok(Self {
            listener,
            frame_config: FrameConfig::default(),
            received: AtomicU64::new(0),
        })
    }

    /// Override decoder limits and socket read timeout.
    pub fn with_frame_config(mut self, config: FrameConfig) -> Self {
        self.frame_config = config;
        self
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Number of files received successfully so far.
    pub fn received_count(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Accept the next connection and receive its file (blocking).
    ///
    /// An incomplete or malformed message is discarded and reported as an
    /// error; the listener stays usable for the next connection.
    pub fn accept_file(&self) -> Result<ReceivedFile> {
        let stream = self.listener.accept()?;
        let peer = stream.peer_addr().ok();
        let mut reader = MessageReader::with_config_stream(stream, self.frame_config.clone())?;

        match receive_message(&mut reader) {
            Ok(file) => {
                self.received.fetch_add(1, Ordering::Relaxed);
                info!(
                    peer = ?peer,
                    file = %file.file_name,
                    size = file.payload.len(),
                    stuffed_size = file.stuffed_size,
                    "file received"
                );
                Ok(file)
            }
            Err(err) => {
                warn!(peer = ?peer, error = %err, "discarding incomplete or malformed transfer");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use stuffsend_frame::{FrameError, ESC, FLAG};

    use super::*;
    use crate::result::ErrorKind;
    use crate::transmitter::{Transmitter, TransmitterConfig};

    fn wire(name: &[u8], frame: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(name.len() as i32).to_be_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&(frame.len() as i32).to_be_bytes());
        out.extend_from_slice(frame);
        out
    }

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stuffsend-rx-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    fn received(name: &str) -> ReceivedFile {
        ReceivedFile {
            file_name: name.to_string(),
            payload: b"data".to_vec(),
            stuffed_size: 6,
        }
    }

    #[test]
    fn receive_message_unstuffs_payload() {
        let mut reader = MessageReader::new(Cursor::new(wire(
            b"a.txt",
            &[FLAG, b'x', ESC, FLAG, b'y', FLAG],
        )));
        let file = receive_message(&mut reader).unwrap();

        assert_eq!(file.file_name, "a.txt");
        assert_eq!(file.payload, [b'x', FLAG, b'y']);
        assert_eq!(file.stuffed_size, 6);
    }

    #[test]
    fn dangling_escape_is_rejected() {
        let mut reader = MessageReader::new(Cursor::new(wire(b"bad", &[FLAG, b'a', ESC, FLAG])));
        let err = receive_message(&mut reader).unwrap_err();

        assert!(matches!(
            err,
            TransferError::Frame(FrameError::DanglingEscape)
        ));
        assert_eq!(err.kind(), ErrorKind::TransmissionError);
    }

    #[test]
    fn truncated_message_is_rejected() {
        // Declares a 100-byte frame but the stream ends after six.
        let mut bytes = wire(b"t", b"Fshort");
        bytes[5..9].copy_from_slice(&100i32.to_be_bytes());

        let mut reader = MessageReader::new(Cursor::new(bytes));
        let err = receive_message(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Frame(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn safe_file_name_keeps_last_component() {
        assert_eq!(received("a.txt").safe_file_name().unwrap(), "a.txt");
        assert_eq!(received("dir/b.bin").safe_file_name().unwrap(), "b.bin");
        assert_eq!(received("/etc/passwd").safe_file_name().unwrap(), "passwd");
    }

    #[test]
    fn safe_file_name_rejects_unusable_names() {
        for name in ["", ".", "..", "/", "a/.."] {
            let err = received(name).safe_file_name().unwrap_err();
            assert!(
                matches!(err, TransferError::InvalidFileName { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn save_into_writes_payload() {
        let dir = unique_temp_dir("save");
        let path = received("../escape.txt").save_into(&dir).unwrap();

        assert_eq!(path, dir.join("escape.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn transmitter_to_receiver_roundtrip() {
        let dir = unique_temp_dir("roundtrip");
        let payload: Vec<u8> = (0..4096u32)
            .map(|i| match i % 5 {
                0 => FLAG,
                1 => ESC,
                _ => (i % 256) as u8,
            })
            .collect();
        let file = dir.join("mixed.bin");
        std::fs::write(&file, &payload).unwrap();

        let receiver = Receiver::bind("127.0.0.1:0").unwrap();
        let tx = Transmitter::new(TransmitterConfig::new(receiver.local_addr().into()));

        let server = std::thread::spawn(move || {
            let file = receiver.accept_file();
            (file, receiver.received_count())
        });

        let result = tx.send(&file);
        let (received, count) = server.join().unwrap();
        let received = received.unwrap();

        let report = result.report().expect("send should succeed");
        assert_eq!(received.file_name, "mixed.bin");
        assert_eq!(received.payload, payload);
        assert_eq!(received.stuffed_size, report.stuffed_size);
        assert_eq!(count, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
