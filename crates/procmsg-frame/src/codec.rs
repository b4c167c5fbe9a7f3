use bytes::BytesMut;

use crate::error::{FrameError, Result};
use crate::frame::Frame;

/// Default maximum line length: 16 MiB.
pub const DEFAULT_MAX_LINE: usize = 16 * 1024 * 1024;

/// Encode a frame as one newline-terminated JSON line.
///
/// `serde_json` never emits raw newlines inside a document, so the result is
/// exactly one line.
pub fn encode_line(frame: &Frame) -> Result<String> {
    let mut line = serde_json::to_string(frame)?;
    line.push('\n');
    Ok(line)
}

/// Decode one frame from a buffer of line-delimited JSON.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete line yet.
/// On success, consumes the line from the buffer. Empty lines (including a
/// bare `\r\n`) are consumed and skipped.
pub fn decode_line(src: &mut BytesMut, max_line_len: usize) -> Result<Option<Frame>> {
    loop {
        let Some(pos) = src.iter().position(|&b| b == b'\n') else {
            if src.len() > max_line_len {
                return Err(FrameError::LineTooLong {
                    len: src.len(),
                    max: max_line_len,
                });
            }
            return Ok(None); // Need more data
        };

        if pos > max_line_len {
            return Err(FrameError::LineTooLong {
                len: pos,
                max: max_line_len,
            });
        }

        let raw = src.split_to(pos + 1);
        let mut line = &raw[..pos];
        if line.last() == Some(&b'\r') {
            line = &line[..line.len() - 1];
        }

        if line.is_empty() {
            tracing::trace!("skipping empty input line");
            continue;
        }

        return Ok(Some(serde_json::from_slice(line)?));
    }
}

/// Configuration for the line codec.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Maximum line length in bytes. Default: 16 MiB.
    pub max_line_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE,
        }
    }
}

/// `tokio_util` codec over the same line format, for async framed streams.
#[cfg(feature = "async")]
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    config: CodecConfig,
}

#[cfg(feature = "async")]
impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "async")]
impl tokio_util::codec::Decoder for FrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        decode_line(src, self.config.max_line_len)
    }
}

#[cfg(feature = "async")]
impl tokio_util::codec::Encoder<Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        let line = encode_line(&frame)?;
        dst.extend_from_slice(line.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::frame::Rpc;
    use crate::payload::Payload;

    fn rpc_frame() -> Frame {
        Frame::from(
            Rpc::new("foo", Payload::from_value(json!({"foo": "bar"})).unwrap())
                .with_uniqid("bar"),
        )
    }

    #[test]
    fn encode_decode_roundtrip() {
        let frame = rpc_frame();
        let line = encode_line(&frame).unwrap();
        assert!(line.ends_with('\n'));

        let mut buf = BytesMut::from(line.as_bytes());
        let decoded = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();

        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn reference_serialization() {
        let line = encode_line(&rpc_frame()).unwrap();
        assert_eq!(
            line,
            "{\"type\":\"rpc\",\"uniqid\":\"bar\",\"target\":\"foo\",\"payload\":{\"foo\":\"bar\"}}\n"
        );
    }

    #[test]
    fn decode_incomplete_line() {
        let mut buf = BytesMut::from(&b"{\"type\":\"rpc\""[..]);
        let result = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), 13); // Untouched until the newline arrives
    }

    #[test]
    fn decode_skips_empty_lines() {
        let mut buf = BytesMut::from(&b"\n\r\n"[..]);
        let line = encode_line(&rpc_frame()).unwrap();
        buf.extend_from_slice(line.as_bytes());

        let decoded = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();
        assert_eq!(decoded, rpc_frame());
    }

    #[test]
    fn decode_strips_carriage_return() {
        let mut line = serde_json::to_string(&rpc_frame()).unwrap();
        line.push_str("\r\n");
        let mut buf = BytesMut::from(line.as_bytes());

        let decoded = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();
        assert_eq!(decoded, rpc_frame());
    }

    #[test]
    fn decode_multiple_frames() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(encode_line(&rpc_frame()).unwrap().as_bytes());
        buf.extend_from_slice(
            encode_line(&Frame::rpc_success("bar", Payload::new()))
                .unwrap()
                .as_bytes(),
        );

        let f1 = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();
        let f2 = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();

        assert_eq!(f1.kind(), "rpc");
        assert_eq!(f2.kind(), "rpc-success");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_line_too_long() {
        let mut buf = BytesMut::from(vec![b'x'; 64].as_slice());
        let result = decode_line(&mut buf, 16);
        assert!(matches!(result, Err(FrameError::LineTooLong { .. })));
    }

    #[test]
    fn decode_complete_line_too_long() {
        let mut buf = BytesMut::from(&b"{\"type\":\"rpc\",\"uniqid\":\"\",\"target\":\"t\",\"payload\":{}}\n"[..]);
        let result = decode_line(&mut buf, 8);
        assert!(matches!(result, Err(FrameError::LineTooLong { .. })));
    }

    #[test]
    fn decode_malformed_json() {
        let mut buf = BytesMut::from(&b"{not json}\n"[..]);
        let result = decode_line(&mut buf, DEFAULT_MAX_LINE);
        assert!(matches!(result, Err(FrameError::Json(_))));
    }
}
