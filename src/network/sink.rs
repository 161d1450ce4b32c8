//! Outbound side of a connection.
//!
//! Anything that can "write one line" implements [`LineSink`]. Formatting is
//! done once by [`relay_proto::Command::to_line`]; [`send`] pairs the two so
//! handlers never duplicate either step.

use crate::error::TransportError;
use async_trait::async_trait;
use relay_proto::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Capacity of the per-connection outgoing line queue.
pub const OUTBOUND_QUEUE_SIZE: usize = 256;

/// A target that accepts formatted protocol lines.
#[async_trait]
pub trait LineSink: Send + Sync {
    /// Queue one CRLF-terminated line for delivery.
    async fn write_line(&self, line: &str) -> Result<(), TransportError>;

    /// Close the underlying transport. Idempotent.
    fn close(&self);

    /// True once [`close`](Self::close) has been called.
    fn is_closed(&self) -> bool;
}

/// Format `command` and write it to `target`.
pub async fn send<T>(target: &T, command: &Command) -> Result<(), TransportError>
where
    T: LineSink + ?Sized,
{
    target.write_line(&command.to_line()).await
}

/// Sink feeding a connection's writer task.
///
/// Lines go through a bounded queue; closing cancels the token shared with
/// the writer task and the session read loop.
#[derive(Debug)]
pub struct ConnectionSink {
    tx: mpsc::Sender<String>,
    closed: CancellationToken,
}

impl ConnectionSink {
    /// Create a sink and the receiving end its writer task drains.
    pub fn new(closed: CancellationToken) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_SIZE);
        (Self { tx, closed }, rx)
    }
}

#[async_trait]
impl LineSink for ConnectionSink {
    async fn write_line(&self, line: &str) -> Result<(), TransportError> {
        if self.closed.is_cancelled() {
            return Err(TransportError::Closed);
        }
        trace!(line = %line.trim_end(), "server -> client");
        self.tx
            .send(line.to_string())
            .await
            .map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        self.closed.cancel();
    }

    fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}
