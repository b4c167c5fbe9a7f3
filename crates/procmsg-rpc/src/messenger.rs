use std::sync::Arc;

use procmsg_frame::{Channel, Frame, Payload, Rpc};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::host::Host;
use crate::outcome::OutcomeSource;
use crate::pending::PendingCalls;
use crate::registry::Registry;

/// A frame queued for one of the output channels.
pub type OutboundFrame = (Channel, Frame);

/// A registry bound to this process's output channels — the production
/// [`Host`].
///
/// Frames are queued on an unbounded channel and written by a single pump
/// task per process (see [`crate::stdio`]), which keeps every line atomic on
/// its sink. The messenger also owns the caller side: outbound calls get a
/// fresh id here and their replies are routed back through [`Messenger::settle`].
pub struct Messenger {
    registry: Registry,
    outbound: mpsc::UnboundedSender<OutboundFrame>,
    pending: PendingCalls,
}

impl Messenger {
    /// Wrap a populated registry. The returned receiver feeds the writer
    /// pump; dropping every clone of the messenger closes it.
    pub fn new(registry: Registry) -> (Arc<Self>, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                registry,
                outbound,
                pending: PendingCalls::new(),
            }),
            rx,
        )
    }

    /// Start an outbound call: assign a fresh correlation id, queue the
    /// `rpc` frame on stdout, and return the source of its replies.
    ///
    /// There is no built-in timeout — a peer that never answers leaves the
    /// call outstanding; race the source against a timer if one is wanted.
    pub fn call(&self, target: impl Into<String>, payload: Payload) -> OutcomeSource {
        let (uniqid, source) = self.pending.begin();
        let rpc = Rpc::new(target, payload).with_uniqid(uniqid);
        self.write_frame(Channel::Stdout, Frame::from(rpc));
        source
    }

    /// Route an inbound reply frame to its outstanding outbound call.
    pub fn settle(&self, frame: Frame) -> bool {
        self.pending.settle(frame)
    }

    /// Calls started with [`Messenger::call`] still awaiting a terminal
    /// reply.
    pub fn outstanding_calls(&self) -> usize {
        self.pending.outstanding()
    }

    /// The registered target names, unordered.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }
}

impl Host for Messenger {
    fn has_target(&self, name: &str) -> bool {
        self.registry.has_target(name)
    }

    fn invoke(&self, name: &str, payload: Payload) -> Result<OutcomeSource> {
        self.registry.invoke(name, payload)
    }

    fn write_frame(&self, channel: Channel, frame: Frame) {
        if self.outbound.send((channel, frame)).is_err() {
            tracing::debug!(channel = %channel, "writer pump is gone; dropping frame");
        }
    }
}
