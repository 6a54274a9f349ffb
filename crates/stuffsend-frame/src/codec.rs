use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::stuffing::{unstuff, StuffedFrame};

/// Size of each length prefix on the wire.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default maximum file-name length accepted by the decoder: 4 KiB.
pub const DEFAULT_MAX_NAME_LEN: usize = 4 * 1024;

/// Default maximum stuffed frame length accepted by the decoder: 1 GiB.
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024 * 1024;

/// One file transfer as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMessage {
    /// Raw file-name bytes.
    pub name: Bytes,
    /// The stuffed frame, delimiters included.
    pub frame: Bytes,
}

impl TransferMessage {
    /// Value of the `nameLength` prefix.
    pub fn name_length(&self) -> Result<i32> {
        length_prefix("name", self.name.len())
    }

    /// Value of the `frameLength` prefix.
    pub fn frame_length(&self) -> Result<i32> {
        length_prefix("frame", self.frame.len())
    }

    /// The total wire size of this message (both prefixes + name + frame).
    pub fn wire_size(&self) -> usize {
        2 * LENGTH_PREFIX_SIZE + self.name.len() + self.frame.len()
    }

    /// Unstuff the frame back into the original payload.
    pub fn payload(&self) -> Result<Vec<u8>> {
        unstuff(&self.frame)
    }
}

fn length_prefix(field: &'static str, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| FrameError::LengthOverflow { field, size: len })
}

/// Encode everything that precedes the frame bytes: name length, name, frame
/// length.
///
/// Lets a writer stream a large frame without copying it into the header
/// buffer first.
pub fn encode_header(name: &[u8], frame_len: usize, dst: &mut BytesMut) -> Result<()> {
    let name_len = length_prefix("name", name.len())?;
    let frame_len = length_prefix("frame", frame_len)?;
    dst.reserve(2 * LENGTH_PREFIX_SIZE + name.len());
    dst.put_i32(name_len);
    dst.put_slice(name);
    dst.put_i32(frame_len);
    Ok(())
}

/// Encode a complete transfer message into the wire format.
///
/// Wire format (all integers big-endian signed 32-bit):
/// ```text
/// ┌────────────┬──────────────┬─────────────┬───────────────────────┐
/// │ nameLength │ name         │ frameLength │ frame                 │
/// │ (4B BE)    │ (nameLength) │ (4B BE)     │ FLAG ... stuffed FLAG │
/// └────────────┴──────────────┴─────────────┴───────────────────────┘
/// ```
pub fn encode_message(name: &[u8], frame: &StuffedFrame, dst: &mut BytesMut) -> Result<()> {
    encode_header(name, frame.len(), dst)?;
    dst.reserve(frame.len());
    dst.put_slice(frame.as_bytes());
    Ok(())
}

fn read_length(src: &[u8], at: usize, field: &'static str, max: usize) -> Result<usize> {
    let raw = i32::from_be_bytes([src[at], src[at + 1], src[at + 2], src[at + 3]]);
    if raw < 0 {
        return Err(FrameError::NegativeLength { field, value: raw });
    }
    let len = raw as usize;
    if len > max {
        return Err(FrameError::TooLarge {
            field,
            size: len,
            max,
        });
    }
    Ok(len)
}

/// Decode a transfer message from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete message yet.
/// On success, consumes the message bytes from the buffer. Length prefixes
/// are validated as soon as they arrive.
pub fn decode_message(src: &mut BytesMut, config: &FrameConfig) -> Result<Option<TransferMessage>> {
    if src.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }
    let name_len = read_length(&src[..], 0, "name", config.max_name_len)?;

    let frame_prefix_at = LENGTH_PREFIX_SIZE + name_len;
    if src.len() < frame_prefix_at + LENGTH_PREFIX_SIZE {
        return Ok(None);
    }
    let frame_len = read_length(&src[..], frame_prefix_at, "frame", config.max_frame_len)?;

    let total = frame_prefix_at + LENGTH_PREFIX_SIZE + frame_len;
    // The declared length is untrusted; the buffer grows only with bytes
    // that actually arrive.
    if src.len() < total {
        return Ok(None);
    }

    src.advance(LENGTH_PREFIX_SIZE);
    let name = src.split_to(name_len).freeze();
    src.advance(LENGTH_PREFIX_SIZE);
    let frame = src.split_to(frame_len).freeze();

    Ok(Some(TransferMessage { name, frame }))
}

/// Configuration for the message codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum file-name length in bytes. Default: 4 KiB.
    pub max_name_len: usize,
    /// Maximum stuffed frame length in bytes. Default: 1 GiB.
    pub max_frame_len: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
