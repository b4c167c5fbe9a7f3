//! The RPC call lifecycle over a child process's standard streams.
//!
//! This is the correlation layer of the messenger: an inbound `rpc` frame
//! is resolved against the target registry, invoked, and its outcome —
//! any number of progress events followed by exactly one success or error —
//! is translated back into reply frames sharing the call's `uniqid`.
//! Multiple calls share the two output channels; a caller demultiplexes by
//! id, never by arrival order.

pub mod error;
pub mod handler;
pub mod host;
pub mod messenger;
pub mod outcome;
pub mod pending;
pub mod registry;
pub mod stdio;

pub use error::{Result, RpcError};
pub use handler::{handle, TARGET_MISSING_MESSAGE};
pub use host::Host;
pub use messenger::{Messenger, OutboundFrame};
pub use outcome::{Outcome, OutcomeSender, OutcomeSource};
pub use pending::PendingCalls;
pub use registry::{Registry, TargetResult};
pub use stdio::{serve, serve_streams};
