//! Byte-stuffed framing and the stuffsend wire message.
//!
//! A payload is turned into a self-delimited frame with two reserved bytes:
//! - `FLAG` (`F`) opens and closes the frame
//! - `ESC` (`E`) precedes every payload byte equal to `FLAG` or `ESC`
//!
//! The frame travels behind the file name, each with a big-endian `i32`
//! length prefix. Decoding is incremental, so readers never see a partial
//! message.

pub mod codec;
pub mod error;
pub mod reader;
pub mod stuffing;
pub mod writer;

pub use codec::{
    decode_message, encode_header, encode_message, FrameConfig, TransferMessage,
    DEFAULT_MAX_FRAME_LEN, DEFAULT_MAX_NAME_LEN, LENGTH_PREFIX_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::MessageReader;
pub use stuffing::{stuff, stuffed_len, unstuff, StuffedFrame, ESC, FLAG};
pub use writer::MessageWriter;
