//! Line-delimited JSON framing for parent/child process messaging.
//!
//! Every message is one self-contained JSON object on one newline-terminated
//! line:
//! - A `type` discriminator (`rpc`, `rpc-success`, `rpc-error`, `rpc-notify`)
//! - A `uniqid` correlation token linking an invocation to its replies
//! - A `payload` carrying the message body
//!
//! No partial lines, no buffer management in user code.

pub mod channel;
pub mod codec;
pub mod error;
pub mod frame;
pub mod payload;
pub mod reader;
pub mod writer;

pub use channel::Channel;
#[cfg(feature = "async")]
pub use codec::FrameCodec;
pub use codec::{decode_line, encode_line, CodecConfig, DEFAULT_MAX_LINE};
pub use error::{FrameError, Result};
pub use frame::{Frame, Rpc};
pub use payload::Payload;
pub use reader::LineReader;
pub use writer::LineWriter;
