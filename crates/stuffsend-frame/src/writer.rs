use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use stuffsend_transport::TransferStream;

use crate::codec::{encode_header, FrameConfig};
use crate::error::{FrameError, Result};
use crate::stuffing::StuffedFrame;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes complete transfer messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write name metadata followed by the stuffed frame (blocking).
    ///
    /// The frame is written as one contiguous block straight from its
    /// buffer. Returns the number of bytes put on the wire.
    pub fn write_message(&mut self, name: &[u8], frame: &StuffedFrame) -> Result<usize> {
        self.buf.clear();
        encode_header(name, frame.len(), &mut self.buf)?;

        write_all(&mut self.inner, &self.buf)?;
        write_all(&mut self.inner, frame.as_bytes())?;
        self.flush()?;

        Ok(self.buf.len() + frame.len())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current message writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

fn write_all<T: Write>(inner: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}

impl MessageWriter<TransferStream> {
    /// Create a message writer for `TransferStream` and apply write timeout from config.
    pub fn with_config_stream(inner: TransferStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

pub(crate) fn transport_to_frame_error(err: stuffsend_transport::TransportError) -> FrameError {
    match err {
        stuffsend_transport::TransportError::Io(io)
        | stuffsend_transport::TransportError::Accept(io) => FrameError::Io(io),
        stuffsend_transport::TransportError::Resolve { source, .. }
        | stuffsend_transport::TransportError::Bind { source, .. }
        | stuffsend_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
    }
}
