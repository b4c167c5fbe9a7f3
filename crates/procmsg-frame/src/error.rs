/// Errors that can occur while encoding or decoding frame lines.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The line is not valid JSON or not a known frame shape.
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    /// A line exceeds the configured maximum length.
    #[error("line too long ({len} bytes, max {max})")]
    LineTooLong { len: usize, max: usize },

    /// A payload was built from a JSON value that is not an object.
    #[error("payload must be a JSON object, got {got}")]
    NotAnObject { got: &'static str },

    /// An I/O error occurred while reading or writing lines.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed mid-line or mid-write.
    #[error("connection closed (incomplete line)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
