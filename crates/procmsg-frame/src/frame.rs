use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::Payload;

/// An RPC invocation: run `target` with `payload`, reply under `uniqid`.
///
/// `uniqid` is an opaque correlation token assigned by the caller before
/// sending. A value constructed through [`Rpc::new`] carries an empty id;
/// the sender rebinds it with [`Rpc::with_uniqid`] at send time. An empty id
/// is only valid for frames that never expect a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rpc {
    pub uniqid: String,
    pub target: String,
    pub payload: Payload,
}

impl Rpc {
    /// Create an invocation template with an unassigned correlation id.
    pub fn new(target: impl Into<String>, payload: Payload) -> Self {
        Self {
            uniqid: String::new(),
            target: target.into(),
            payload,
        }
    }

    /// Copy this invocation with a different correlation id.
    ///
    /// The original value is never altered; `Rpc` is a value type, not a
    /// mutable record.
    pub fn with_uniqid(&self, uniqid: impl Into<String>) -> Self {
        Self {
            uniqid: uniqid.into(),
            target: self.target.clone(),
            payload: self.payload.clone(),
        }
    }
}

/// One self-contained protocol message, one line on the wire.
///
/// Every frame carries a `type` discriminator and a `uniqid` correlation
/// token. An `rpc` frame additionally names its `target`; the three reply
/// kinds carry only the id and a payload. The `rpc-error` payload may be any
/// JSON value — whatever shape the failing target produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Frame {
    Rpc(Rpc),
    RpcSuccess { uniqid: String, payload: Payload },
    RpcError { uniqid: String, payload: Value },
    RpcNotify { uniqid: String, payload: Payload },
}

impl Frame {
    /// Build a success reply for the given call id.
    pub fn rpc_success(uniqid: impl Into<String>, payload: Payload) -> Self {
        Frame::RpcSuccess {
            uniqid: uniqid.into(),
            payload,
        }
    }

    /// Build an error reply for the given call id.
    pub fn rpc_error(uniqid: impl Into<String>, payload: impl Into<Value>) -> Self {
        Frame::RpcError {
            uniqid: uniqid.into(),
            payload: payload.into(),
        }
    }

    /// Build a progress notification for the given call id.
    pub fn rpc_notify(uniqid: impl Into<String>, payload: Payload) -> Self {
        Frame::RpcNotify {
            uniqid: uniqid.into(),
            payload,
        }
    }

    /// The correlation id this frame belongs to.
    pub fn uniqid(&self) -> &str {
        match self {
            Frame::Rpc(rpc) => &rpc.uniqid,
            Frame::RpcSuccess { uniqid, .. }
            | Frame::RpcError { uniqid, .. }
            | Frame::RpcNotify { uniqid, .. } => uniqid,
        }
    }

    /// The wire name of this frame's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Rpc(_) => "rpc",
            Frame::RpcSuccess { .. } => "rpc-success",
            Frame::RpcError { .. } => "rpc-error",
            Frame::RpcNotify { .. } => "rpc-notify",
        }
    }
}

impl From<Rpc> for Frame {
    fn from(rpc: Rpc) -> Self {
        Frame::Rpc(rpc)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload() -> Payload {
        Payload::from_value(json!({"foo": "bar"})).unwrap()
    }

    #[test]
    fn rpc_serializes_in_reference_order() {
        let frame = Frame::from(Rpc::new("foo", payload()).with_uniqid("bar"));
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"type":"rpc","uniqid":"bar","target":"foo","payload":{"foo":"bar"}}"#
        );
    }

    #[test]
    fn new_rpc_has_empty_uniqid() {
        let frame = Frame::from(Rpc::new("foo", payload()));
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"type":"rpc","uniqid":"","target":"foo","payload":{"foo":"bar"}}"#
        );
    }

    #[test]
    fn with_uniqid_rebinds_without_mutation() {
        let base = Rpc::new("foo", payload());
        let rebound = base.with_uniqid("abc");

        assert_eq!(rebound.uniqid, "abc");
        assert_eq!(rebound.target, base.target);
        assert_eq!(rebound.payload, base.payload);
        assert_eq!(base.uniqid, "");
    }

    #[test]
    fn reply_kinds_serialize_without_target() {
        let success = Frame::rpc_success("id1", payload());
        assert_eq!(
            serde_json::to_string(&success).unwrap(),
            r#"{"type":"rpc-success","uniqid":"id1","payload":{"foo":"bar"}}"#
        );

        let notify = Frame::rpc_notify("id1", payload());
        assert_eq!(
            serde_json::to_string(&notify).unwrap(),
            r#"{"type":"rpc-notify","uniqid":"id1","payload":{"foo":"bar"}}"#
        );
    }

    #[test]
    fn error_payload_may_be_any_shape() {
        let frame = Frame::rpc_error("id1", json!("plain string"));
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"type":"rpc-error","uniqid":"id1","payload":"plain string"}"#
        );
    }

    #[test]
    fn deserializes_by_type_tag() {
        let frame: Frame =
            serde_json::from_str(r#"{"type":"rpc","uniqid":"x","target":"t","payload":{}}"#)
                .unwrap();
        assert!(matches!(frame, Frame::Rpc(ref rpc) if rpc.target == "t"));

        let frame: Frame =
            serde_json::from_str(r#"{"type":"rpc-error","uniqid":"x","payload":[1,2]}"#).unwrap();
        assert_eq!(frame.kind(), "rpc-error");
        assert_eq!(frame.uniqid(), "x");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result = serde_json::from_str::<Frame>(r#"{"type":"bogus","uniqid":"x"}"#);
        assert!(result.is_err());
    }
}
