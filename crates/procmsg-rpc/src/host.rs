use procmsg_frame::{Channel, Frame, Payload};

use crate::error::Result;
use crate::outcome::OutcomeSource;

/// The process-side collaborator a call handler drives.
///
/// Owns the target registry and the two output channels. Passed to
/// [`crate::handler::handle`] explicitly rather than captured in a closure,
/// so the handler stays independent of any concrete messenger state.
pub trait Host: Send + Sync + 'static {
    /// Whether a target with this name is registered.
    fn has_target(&self, name: &str) -> bool;

    /// Invoke a registered target with the call payload.
    ///
    /// A synchronous failure is the `Err` case; an asynchronous one arrives
    /// through the returned source's `Rejected` event.
    fn invoke(&self, name: &str, payload: Payload) -> Result<OutcomeSource>;

    /// Queue one frame for the given output channel.
    ///
    /// Implementations must emit each call as one atomic line on the
    /// channel's sink; a frame that can no longer be delivered (the sink is
    /// gone) is dropped, never an error the handler sees.
    fn write_frame(&self, channel: Channel, frame: Frame);
}
