//! Telemetry utilities for command timing and tracing spans.

use std::time::Instant;
use tracing::trace;

/// Guard for timing command execution.
///
/// Emits the handler latency as a trace event when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        trace!(command = %self.command, micros, "command handled");
    }
}

/// Standardized span constructors.
pub mod spans {
    use std::net::SocketAddr;
    use tracing::field::Empty;
    use tracing::{Span, info_span};

    /// Create a span for a client connection.
    ///
    /// `nick` and `session` are recorded once the handshake completes.
    pub fn connection(addr: &SocketAddr) -> Span {
        info_span!("connection", addr = %addr, nick = Empty, session = Empty)
    }

    /// Create a span for a command execution.
    pub fn command(name: &str, source: &str, target: Option<&str>) -> Span {
        if let Some(target) = target {
            info_span!("command", name = %name, source = %source, target = %target)
        } else {
            info_span!("command", name = %name, source = %source)
        }
    }
}
