//! Output channel identifiers.
//!
//! A child process has exactly two outbound sinks: success and progress
//! frames go to stdout, error frames to stderr. A correct parent
//! demultiplexes replies solely by `uniqid`, never by arrival order.

use std::fmt;

/// One of the two output channels shared by all outstanding calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stdout,
    Stderr,
}

impl Channel {
    /// Returns the channel's lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Stdout => "stdout",
            Channel::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
