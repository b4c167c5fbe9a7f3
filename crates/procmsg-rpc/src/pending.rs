use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

use procmsg_frame::Frame;

use crate::outcome::{OutcomeSender, OutcomeSource};

/// Outstanding outbound calls, keyed by correlation id.
///
/// The sending side registers a call before its frame leaves the process;
/// inbound reply frames are routed back by id alone — arrival order across
/// calls means nothing.
#[derive(Debug, Default)]
pub struct PendingCalls {
    calls: Mutex<HashMap<String, OutcomeSender>>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new call under a fresh id, unique among outstanding calls.
    pub fn begin(&self) -> (String, OutcomeSource) {
        let (sender, source) = OutcomeSource::channel();
        let mut calls = self.lock();
        loop {
            let uniqid = fresh_uniqid();
            match calls.entry(uniqid.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(sender);
                    return (uniqid, source);
                }
            }
        }
    }

    /// Route an inbound reply frame to its outstanding call.
    ///
    /// Terminal frames remove the entry. Returns `false` for ids with no
    /// outstanding call (late, duplicate, or foreign replies) and for
    /// non-reply frames; those are dropped.
    pub fn settle(&self, frame: Frame) -> bool {
        match frame {
            Frame::RpcSuccess { uniqid, payload } => match self.lock().remove(&uniqid) {
                Some(sender) => {
                    sender.resolve(payload);
                    true
                }
                None => unknown(&uniqid, "rpc-success"),
            },
            Frame::RpcError { uniqid, payload } => match self.lock().remove(&uniqid) {
                Some(sender) => {
                    sender.reject(payload);
                    true
                }
                None => unknown(&uniqid, "rpc-error"),
            },
            Frame::RpcNotify { uniqid, payload } => match self.lock().get_mut(&uniqid) {
                Some(sender) => {
                    sender.progress(payload);
                    true
                }
                None => unknown(&uniqid, "rpc-notify"),
            },
            Frame::Rpc(rpc) => {
                tracing::debug!(uniqid = %rpc.uniqid, "rpc frame is not a reply; dropping");
                false
            }
        }
    }

    /// Number of calls still awaiting a terminal reply.
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, OutcomeSender>> {
        self.calls.lock().expect("pending-call table poisoned")
    }
}

fn unknown(uniqid: &str, kind: &str) -> bool {
    tracing::debug!(uniqid = %uniqid, kind = %kind, "reply for unknown call id; dropping");
    false
}

/// 16 hex chars of process-local randomness.
fn fresh_uniqid() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use procmsg_frame::Payload;
    use serde_json::json;

    use super::*;
    use crate::outcome::Outcome;

    fn payload(v: serde_json::Value) -> Payload {
        Payload::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn success_settles_and_removes_the_call() {
        let pending = PendingCalls::new();
        let (uniqid, mut source) = pending.begin();
        assert_eq!(pending.outstanding(), 1);

        assert!(pending.settle(Frame::rpc_success(&uniqid, payload(json!({"ok": true})))));
        assert_eq!(pending.outstanding(), 0);

        assert_eq!(
            source.next().await,
            Some(Outcome::Resolved(payload(json!({"ok": true}))))
        );
        assert_eq!(source.next().await, None);
    }

    #[tokio::test]
    async fn notify_keeps_the_call_outstanding() {
        let pending = PendingCalls::new();
        let (uniqid, mut source) = pending.begin();

        assert!(pending.settle(Frame::rpc_notify(&uniqid, payload(json!({"step": 1})))));
        assert_eq!(pending.outstanding(), 1);

        assert!(pending.settle(Frame::rpc_error(&uniqid, json!("gone wrong"))));
        assert_eq!(pending.outstanding(), 0);

        assert_eq!(
            source.next().await,
            Some(Outcome::Progress(payload(json!({"step": 1}))))
        );
        assert_eq!(source.next().await, Some(Outcome::Rejected(json!("gone wrong"))));
    }

    #[test]
    fn unknown_and_duplicate_replies_are_dropped() {
        let pending = PendingCalls::new();
        let (uniqid, _source) = pending.begin();

        assert!(!pending.settle(Frame::rpc_success("someone-else", Payload::new())));
        assert!(pending.settle(Frame::rpc_success(&uniqid, Payload::new())));
        // A second terminal frame for the same id no longer matches.
        assert!(!pending.settle(Frame::rpc_error(&uniqid, json!("late"))));
    }

    #[test]
    fn inbound_rpc_frames_are_not_replies() {
        let pending = PendingCalls::new();
        let frame = Frame::from(procmsg_frame::Rpc::new("t", Payload::new()));
        assert!(!pending.settle(frame));
    }

    #[test]
    fn ids_are_unique_among_outstanding_calls() {
        let pending = PendingCalls::new();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..64 {
            let (uniqid, _source) = pending.begin();
            assert_eq!(uniqid.len(), 16);
            assert!(ids.insert(uniqid));
        }
    }
}
