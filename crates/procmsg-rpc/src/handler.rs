use std::sync::Arc;

use procmsg_frame::{Channel, Frame, Rpc};
use serde_json::json;

use crate::host::Host;
use crate::outcome::{Outcome, OutcomeSource};

/// Fixed error payload message for an `rpc` frame naming an unregistered
/// target. Part of the wire protocol, not a diagnostic.
pub const TARGET_MISSING_MESSAGE: &str = "Target doesn't exist";

/// Drive one inbound `rpc` frame to completion.
///
/// Resolution and invocation happen before this returns; outcome translation
/// continues on a spawned task, so any number of calls can be outstanding
/// while the read loop services further frames. Completion is observable
/// only through the frames written to the host's channels, every one
/// correlated by the inbound frame's `uniqid`:
///
/// - unknown target → one `rpc-error` on stderr, fixed message, no invocation
/// - each progress event → one `rpc-notify` on stdout
/// - resolution → one `rpc-success` on stdout, terminal
/// - rejection (synchronous or asynchronous) → one `rpc-error` on stderr,
///   terminal
///
/// Nothing here is fatal to the host process.
pub fn handle<H: Host>(rpc: Rpc, host: Arc<H>) {
    let Rpc {
        uniqid,
        target,
        payload,
    } = rpc;

    if !host.has_target(&target) {
        tracing::debug!(target = %target, uniqid = %uniqid, "rpc target not registered");
        host.write_frame(
            Channel::Stderr,
            Frame::rpc_error(uniqid, json!({ "message": TARGET_MISSING_MESSAGE })),
        );
        return;
    }

    // A synchronous raise must be indistinguishable from an asynchronous
    // rejection, so it becomes an already-rejected source and flows through
    // the same translation path.
    let source = match host.invoke(&target, payload) {
        Ok(source) => source,
        Err(err) => OutcomeSource::rejected(err.into_payload()),
    };

    tokio::spawn(translate(uniqid, source, host));
}

/// Translate outcome events into reply frames, in emission order.
///
/// Stops after the first terminal event; one write per event, no buffering.
async fn translate<H: Host>(uniqid: String, mut source: OutcomeSource, host: Arc<H>) {
    while let Some(event) = source.next().await {
        let terminal = event.is_terminal();
        let (channel, frame) = match event {
            Outcome::Progress(payload) => {
                (Channel::Stdout, Frame::rpc_notify(uniqid.clone(), payload))
            }
            Outcome::Resolved(payload) => {
                (Channel::Stdout, Frame::rpc_success(uniqid.clone(), payload))
            }
            Outcome::Rejected(payload) => {
                (Channel::Stderr, Frame::rpc_error(uniqid.clone(), payload))
            }
        };
        host.write_frame(channel, frame);
        if terminal {
            return;
        }
    }
    tracing::debug!(uniqid = %uniqid, "outcome source ended without a terminal event");
}
