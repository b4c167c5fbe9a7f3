//! Parent/child process messaging over line-delimited JSON frames.
//!
//! procmsg lets a parent process exchange RPC calls, replies, and progress
//! notifications with spawned child processes over the children's standard
//! streams, correlated by per-call ids.
//!
//! # Crate Structure
//!
//! - [`frame`] — Wire data model and line codec
//! - [`rpc`] — Call lifecycle: registry, outcome sources, serve loop

/// Re-export frame types.
pub mod frame {
    pub use procmsg_frame::*;
}

/// Re-export RPC types.
pub mod rpc {
    pub use procmsg_rpc::*;
}
