use serde_json::Value;

/// Errors that can occur in the RPC layer.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// `invoke` was called with a name the registry doesn't know.
    ///
    /// The call handler never takes this path — it checks `has_target`
    /// first and answers with the fixed-message error frame instead.
    #[error("unknown target: {0}")]
    UnknownTarget(String),

    /// A target raised synchronously instead of settling its outcome
    /// source. Carries the raised value verbatim.
    #[error("target fault: {0}")]
    Fault(Value),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] procmsg_frame::FrameError),

    /// The outbound queue or underlying stream is gone.
    #[error("messenger disconnected")]
    Disconnected,
}

impl RpcError {
    /// The payload an `rpc-error` frame should carry for this error.
    ///
    /// A fault propagates the target's raised value unchanged; everything
    /// else is wrapped as `{"message": ...}`.
    pub fn into_payload(self) -> Value {
        match self {
            RpcError::Fault(value) => value,
            other => serde_json::json!({ "message": other.to_string() }),
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
