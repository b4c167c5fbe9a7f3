use std::collections::HashMap;

use procmsg_frame::Payload;
use serde_json::Value;

use crate::error::{Result, RpcError};
use crate::outcome::{OutcomeSender, OutcomeSource};

/// A registered target implementation.
///
/// Receives the call payload and the producing half of a fresh outcome
/// channel; it may settle the channel before returning or hand the sender to
/// a spawned task. Returning `Err` is the synchronous-raise path — the value
/// is preserved verbatim as the call's rejection payload, and anything
/// already sent on the channel is discarded.
pub type TargetResult = std::result::Result<(), Value>;

type BoxedTarget = Box<dyn Fn(Payload, OutcomeSender) -> TargetResult + Send + Sync>;

/// The long-lived map from target names to handlers.
///
/// Populated at startup, consulted read-only per call — no locking on the
/// dispatch path.
#[derive(Default)]
pub struct Registry {
    targets: HashMap<String, BoxedTarget>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target under `name`, replacing any previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, target: F)
    where
        F: Fn(Payload, OutcomeSender) -> TargetResult + Send + Sync + 'static,
    {
        self.targets.insert(name.into(), Box::new(target));
    }

    /// Register a plain request/response function.
    ///
    /// The returned payload resolves the call immediately; an `Err` value
    /// raises, exactly as a handwritten target returning `Err` would.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Payload) -> std::result::Result<Payload, Value> + Send + Sync + 'static,
    {
        self.register(name, move |payload, sender| {
            let reply = f(payload)?;
            sender.resolve(reply);
            Ok(())
        });
    }

    /// Whether a target with this name is registered.
    pub fn has_target(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Invoke a target, producing the source of its outcome events.
    pub fn invoke(&self, name: &str, payload: Payload) -> Result<OutcomeSource> {
        let target = self
            .targets
            .get(name)
            .ok_or_else(|| RpcError::UnknownTarget(name.to_string()))?;

        let (sender, source) = OutcomeSource::channel();
        match target(payload, sender) {
            Ok(()) => Ok(source),
            Err(raised) => Err(RpcError::Fault(raised)),
        }
    }

    /// Registered target names, unordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("targets", &names).finish()
    }
}
