use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame delimiter: ASCII `F`.
pub const FLAG: u8 = b'F';

/// Escape marker: ASCII `E`.
pub const ESC: u8 = b'E';

/// A FLAG-delimited, ESC-stuffed encoding of a payload.
///
/// Only [`stuff`] constructs one, so the first and last bytes are always
/// FLAG and every interior FLAG or ESC is preceded by exactly one ESC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuffedFrame {
    bytes: Bytes,
}

impl StuffedFrame {
    /// The stuffed bytes, delimiters included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total frame length, delimiters included. Never less than 2.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; even an empty payload stuffs to two FLAG bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the frame and return the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Recover the original payload.
    pub fn unstuff(&self) -> Result<Vec<u8>> {
        unstuff(&self.bytes)
    }
}

impl AsRef<[u8]> for StuffedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[inline]
fn is_reserved(b: u8) -> bool {
    b == FLAG || b == ESC
}

/// Size of `stuff(payload)` without building it.
pub fn stuffed_len(payload: &[u8]) -> usize {
    2 + payload.len() + payload.iter().filter(|&&b| is_reserved(b)).count()
}

/// Byte-stuff `payload` into a self-delimited frame.
///
/// ```text
/// FLAG | payload with ESC inserted before each FLAG/ESC | FLAG
/// ```
///
/// Accepts any input, including an empty one.
pub fn stuff(payload: &[u8]) -> StuffedFrame {
    let mut dst = BytesMut::with_capacity(stuffed_len(payload));
    dst.put_u8(FLAG);
    for &b in payload {
        if is_reserved(b) {
            dst.put_u8(ESC);
        }
        dst.put_u8(b);
    }
    dst.put_u8(FLAG);

    StuffedFrame {
        bytes: dst.freeze(),
    }
}

/// Recover the payload from a stuffed frame.
///
/// The frame must be FLAG-delimited. Inside the delimiters an ESC is dropped
/// and the byte after it is taken literally; a bare FLAG or a trailing ESC
/// makes the frame malformed.
pub fn unstuff(frame: &[u8]) -> Result<Vec<u8>> {
    if frame.len() < 2 || frame[0] != FLAG || frame[frame.len() - 1] != FLAG {
        return Err(FrameError::MissingDelimiter);
    }

    let body = &frame[1..frame.len() - 1];
    let mut out = Vec::with_capacity(body.len());
    let mut iter = body.iter().enumerate();

    while let Some((offset, &b)) = iter.next() {
        match b {
            ESC => match iter.next() {
                Some((_, &literal)) => out.push(literal),
                None => return Err(FrameError::DanglingEscape),
            },
            // Offsets are reported relative to the full frame.
            FLAG => return Err(FrameError::UnexpectedFlag { offset: offset + 1 }),
            other => out.push(other),
        }
    }

    Ok(out)
}
