//! The child-side event loop over standard streams.
//!
//! One task reads frames from the input stream; `rpc` frames are dispatched
//! through [`handle`] and reply frames are routed to outstanding outbound
//! calls. One writer pump drains the outbound queue so each sink has a
//! single writer and every frame lands as one whole line.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use procmsg_frame::{Channel, Frame, FrameCodec, FrameError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, FramedWrite};

use crate::error::Result;
use crate::handler::handle;
use crate::messenger::{Messenger, OutboundFrame};
use crate::registry::Registry;

/// Serve the registry on this process's standard streams until stdin EOF.
pub async fn serve(registry: Registry) -> Result<()> {
    serve_streams(
        registry,
        tokio::io::stdin(),
        tokio::io::stdout(),
        tokio::io::stderr(),
    )
    .await
}

/// Serve the registry on explicit streams.
///
/// Returns once the input stream ends and every already-started call has
/// run to its terminal frame. Malformed lines are skipped with a warning;
/// an I/O failure or oversized line ends the loop with an error.
pub async fn serve_streams<R, O, E>(registry: Registry, input: R, stdout: O, stderr: E) -> Result<()>
where
    R: AsyncRead + Unpin,
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    let (messenger, outbound) = Messenger::new(registry);
    let pump = tokio::spawn(pump_outbound(outbound, stdout, stderr));

    let mut frames = Framed::new(input, FrameCodec::new());
    let result = loop {
        match frames.next().await {
            Some(Ok(Frame::Rpc(rpc))) => handle(rpc, Arc::clone(&messenger)),
            Some(Ok(reply)) => {
                messenger.settle(reply);
            }
            Some(Err(FrameError::Json(err))) => {
                // The offending line is already consumed, but the framed
                // stream latches into an errored state and would yield `None`
                // on the next poll. Rebuild it from its parts (unconsumed
                // buffer intact) so serving continues past the bad line.
                tracing::warn!(error = %err, "skipping malformed frame line");
                frames = Framed::from_parts(frames.into_parts());
            }
            Some(Err(err)) => break Err(err.into()),
            None => break Ok(()),
        }
    };

    // Outstanding calls hold messenger clones; the pump drains until the
    // last one settles, then sees the queue close.
    drop(messenger);
    match pump.await {
        Ok(pump_result) => result.and(pump_result),
        Err(join_err) => {
            tracing::error!(error = %join_err, "writer pump task failed");
            result
        }
    }
}

async fn pump_outbound<O, E>(
    mut outbound: mpsc::UnboundedReceiver<OutboundFrame>,
    stdout: O,
    stderr: E,
) -> Result<()>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let mut stdout = FramedWrite::new(stdout, FrameCodec::new());
    let mut stderr = FramedWrite::new(stderr, FrameCodec::new());

    while let Some((channel, frame)) = outbound.recv().await {
        let write = match channel {
            Channel::Stdout => stdout.send(frame).await,
            Channel::Stderr => stderr.send(frame).await,
        };
        if let Err(err) = write {
            tracing::error!(channel = %channel, error = %err, "frame write failed; stopping pump");
            return Err(err.into());
        }
    }

    Ok(())
}
