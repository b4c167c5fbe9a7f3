use std::io::{ErrorKind, Write};

use crate::codec::{encode_line, CodecConfig};
use crate::error::{FrameError, Result};
use crate::frame::Frame;

/// Writes complete frame lines to any `Write` stream.
///
/// Each frame is written as one whole line followed by a flush, so two
/// writers never interleave partial lines on distinct streams.
pub struct LineWriter<T> {
    inner: T,
    config: CodecConfig,
}

impl<T: Write> LineWriter<T> {
    /// Create a new line writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new line writer with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self { inner, config }
    }

    /// Encode a frame and write it as one line (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let line = encode_line(frame)?;
        if line.len() - 1 > self.config.max_line_len {
            return Err(FrameError::LineTooLong {
                len: line.len() - 1,
                max: self.config.max_line_len,
            });
        }

        let bytes = line.as_bytes();
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
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

    /// Update maximum line length for subsequent encoding.
    pub fn set_max_line_len(&mut self, max_line_len: usize) {
        self.config.max_line_len = max_line_len;
    }

    /// Current writer configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
