use procmsg_frame::Payload;
use serde_json::Value;
use tokio::sync::mpsc;

/// One event from a call's outcome source.
///
/// A well-behaved source emits zero or more `Progress` events strictly
/// followed by exactly one of the terminal kinds, then nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Intermediate update. Non-terminal.
    Progress(Payload),
    /// The call succeeded. Terminal.
    Resolved(Payload),
    /// The call failed. Terminal. The payload may be any JSON shape —
    /// whatever the target produced.
    Rejected(Value),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Progress(_))
    }
}

/// Producing half of an outcome channel.
///
/// The event contract is enforced by ownership: `resolve` and `reject`
/// consume the sender, so nothing can be emitted after the terminal event.
/// Dropping the sender unsettled ends the stream without a terminal event —
/// the call then never completes, which is the caller's timeout problem.
#[derive(Debug)]
pub struct OutcomeSender {
    tx: mpsc::UnboundedSender<Outcome>,
}

impl OutcomeSender {
    /// Emit an intermediate progress event.
    pub fn progress(&mut self, payload: Payload) {
        self.send(Outcome::Progress(payload));
    }

    /// Settle the call successfully.
    pub fn resolve(self, payload: Payload) {
        self.send(Outcome::Resolved(payload));
    }

    /// Settle the call with a failure.
    pub fn reject(self, payload: impl Into<Value>) {
        self.send(Outcome::Rejected(payload.into()));
    }

    fn send(&self, outcome: Outcome) {
        // The consumer may already be gone; its call is over either way.
        let _ = self.tx.send(outcome);
    }
}

/// The asynchronous producer of a call's progress/success/error events.
///
/// Single-producer: exactly one [`OutcomeSender`] feeds each source.
#[derive(Debug)]
pub struct OutcomeSource {
    rx: mpsc::UnboundedReceiver<Outcome>,
}

impl OutcomeSource {
    /// Create a connected sender/source pair for one call.
    pub fn channel() -> (OutcomeSender, OutcomeSource) {
        let (tx, rx) = mpsc::unbounded_channel();
        (OutcomeSender { tx }, OutcomeSource { rx })
    }

    /// A source that is already resolved with `payload`.
    pub fn resolved(payload: Payload) -> Self {
        let (sender, source) = Self::channel();
        sender.resolve(payload);
        source
    }

    /// A source that is already rejected with `payload`.
    ///
    /// This is how a synchronous failure joins the asynchronous path: the
    /// raised value becomes an immediate `Rejected` event.
    pub fn rejected(payload: impl Into<Value>) -> Self {
        let (sender, source) = Self::channel();
        sender.reject(payload);
        source
    }

    /// The next event, in emission order. `None` once the sender is gone.
    pub async fn next(&mut self) -> Option<Outcome> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(n: u64) -> Payload {
        Payload::from_value(json!({ "n": n })).unwrap()
    }

    #[tokio::test]
    async fn progress_then_resolve_in_order() {
        let (mut sender, mut source) = OutcomeSource::channel();
        sender.progress(payload(1));
        sender.progress(payload(2));
        sender.resolve(payload(3));

        assert_eq!(source.next().await, Some(Outcome::Progress(payload(1))));
        assert_eq!(source.next().await, Some(Outcome::Progress(payload(2))));
        assert_eq!(source.next().await, Some(Outcome::Resolved(payload(3))));
        assert_eq!(source.next().await, None);
    }

    #[tokio::test]
    async fn resolved_source_yields_exactly_one_event() {
        let mut source = OutcomeSource::resolved(payload(1));
        assert_eq!(source.next().await, Some(Outcome::Resolved(payload(1))));
        assert_eq!(source.next().await, None);
    }

    #[tokio::test]
    async fn rejected_source_carries_arbitrary_shapes() {
        let mut source = OutcomeSource::rejected(json!("boom"));
        assert_eq!(source.next().await, Some(Outcome::Rejected(json!("boom"))));
        assert_eq!(source.next().await, None);
    }

    #[tokio::test]
    async fn dropped_sender_ends_the_stream_without_terminal() {
        let (mut sender, mut source) = OutcomeSource::channel();
        sender.progress(payload(1));
        drop(sender);

        assert_eq!(source.next().await, Some(Outcome::Progress(payload(1))));
        assert_eq!(source.next().await, None);
    }

    #[test]
    fn terminal_classification() {
        assert!(!Outcome::Progress(payload(1)).is_terminal());
        assert!(Outcome::Resolved(payload(1)).is_terminal());
        assert!(Outcome::Rejected(json!(null)).is_terminal());
    }
}
