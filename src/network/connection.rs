//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task, paired with a writer task:
//!
//! ```text
//! Phase 1: Handshake (NICK / USER / CAP LS, sequential)
//!    ↓
//! Phase 2: Register, welcome burst
//!    ↓
//! Phase 3: Read loop (tokio::select! on next line or close token)
//!
//!   FramedRead ──▶ parse ──▶ Registry::dispatch ──▶ LineSink
//!                                                     │ mpsc
//!                                                     ▼
//!                                  writer task ──▶ FramedWrite
//! ```
//!
//! Closing the connection's [`CancellationToken`] stops both tasks; lines
//! queued before the close are still written.

use crate::error::HandlerError;
use crate::handlers::{Context, Registry, send_welcome_burst};
use crate::network::{ConnectionSink, LineSink, send};
use crate::state::{Matrix, User, UserParams};
use crate::telemetry::spans;
use futures_util::{SinkExt, StreamExt};
use relay_proto::{Command, LineCodec, parse};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, info, warn};

/// Nickname used when a client sends USER without a preceding NICK.
pub const PLACEHOLDER_NICK: &str = "anon";

type LineReader = FramedRead<OwnedReadHalf, LineCodec>;

/// Identity collected during the handshake.
#[derive(Debug)]
struct Handshake {
    nick: String,
    user: String,
    host: String,
}

/// A client connection handler.
pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
    max_line_len: usize,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        matrix: Arc<Matrix>,
        registry: Arc<Registry>,
        max_line_len: usize,
    ) -> Self {
        Self {
            stream,
            addr,
            matrix,
            registry,
            max_line_len,
        }
    }

    /// Run the connection until QUIT, stream close, server-side close or error.
    pub async fn run(self) -> Result<(), HandlerError> {
        let span = spans::connection(&self.addr);
        self.serve().instrument(span).await
    }

    async fn serve(self) -> Result<(), HandlerError> {
        let Self {
            stream,
            matrix,
            registry,
            max_line_len,
            ..
        } = self;
        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, LineCodec::with_max_len(max_line_len));

        let closed = CancellationToken::new();
        let (sink, rx) = ConnectionSink::new(closed.clone());
        let sink = Arc::new(sink);
        let writer = tokio::spawn(
            write_loop(
                FramedWrite::new(write_half, LineCodec::new()),
                rx,
                closed.clone(),
            )
            .in_current_span(),
        );

        let session = Session {
            matrix: &matrix,
            registry: &registry,
            sink: &sink,
            closed: &closed,
        };
        let result = session.run(&mut reader).await;

        closed.cancel();
        if let Err(e) = writer.await {
            warn!(error = %e, "Writer task failed");
        }
        result
    }
}

/// Borrowed state for one connection's lifetime.
struct Session<'a> {
    matrix: &'a Arc<Matrix>,
    registry: &'a Registry,
    sink: &'a Arc<ConnectionSink>,
    closed: &'a CancellationToken,
}

impl Session<'_> {
    async fn run(&self, reader: &mut LineReader) -> Result<(), HandlerError> {
        let Some(handshake) = self.handshake(reader).await? else {
            debug!("Stream closed before registration");
            return Ok(());
        };

        let user = Arc::new(User::new(UserParams {
            nick: handshake.nick,
            user: handshake.user,
            host: handshake.host,
            sink: Arc::clone(self.sink) as Arc<dyn LineSink>,
        }));

        if let Err(e) = self.matrix.users.insert(Arc::clone(&user)) {
            warn!(nick = %user.nick, "Nickname already in use");
            let error = Command::new("ERROR").with_trailing("Nickname is already in use");
            if let Err(e) = send(user.as_ref(), &error).await {
                debug!(nick = %user.nick, error = %e, "ERROR line not delivered");
            }
            return Err(e.into());
        }

        let span = Span::current();
        span.record("nick", user.nick.as_str());
        span.record("session", tracing::field::display(&user.session_id));
        info!(prefix = %user.prefix(), "User registered");

        let result = self.registered(reader, &user).await;

        self.matrix.users.remove_session(&user);
        user.close();
        result
    }

    /// Read lines until USER. Returns None if the stream ends first.
    async fn handshake(&self, reader: &mut LineReader) -> Result<Option<Handshake>, HandlerError> {
        let mut nick: Option<String> = None;

        while let Some(line) = reader.next().await {
            let line = line?;
            debug!(line = %line, "client -> server");
            if line.trim().is_empty() {
                continue;
            }

            let cmd = parse(&line)?;
            match cmd.name.as_str() {
                "NICK" => {
                    if let Some(requested) = cmd.params.first().or(cmd.trailing.as_ref()) {
                        nick = Some(requested.clone());
                    }
                }
                "USER" => {
                    let handshake = Handshake {
                        nick: nick.unwrap_or_else(|| PLACEHOLDER_NICK.to_string()),
                        user: cmd.param(0)?.to_string(),
                        host: cmd.param(2)?.to_string(),
                    };
                    return Ok(Some(handshake));
                }
                "CAP" if cmd.params.first().map(String::as_str) == Some("LS") => {
                    let reply = Command::new("CAP")
                        .with_prefix(self.matrix.server_name())
                        .with_params(["*", "LS"]);
                    send(self.sink.as_ref(), &reply).await?;
                }
                other => debug!(command = %other, "Ignored before registration"),
            }
        }
        Ok(None)
    }

    /// Welcome the user and dispatch its lines until it leaves.
    async fn registered(&self, reader: &mut LineReader, user: &Arc<User>) -> Result<(), HandlerError> {
        let ctx = Context {
            user,
            matrix: self.matrix,
        };
        send_welcome_burst(&ctx).await?;

        loop {
            let next = tokio::select! {
                _ = self.closed.cancelled() => {
                    info!("Connection closed by server");
                    return Ok(());
                }
                next = reader.next() => next,
            };

            let Some(line) = next else {
                info!("Client closed connection");
                return Ok(());
            };
            let line = line?;
            debug!(line = %line, "client -> server");
            if line.trim().is_empty() {
                continue;
            }

            let cmd = parse(&line)?;
            if cmd.name == "QUIT" {
                info!(reason = cmd.trailing.as_deref().unwrap_or(""), "Client quit");
                return Ok(());
            }
            self.registry.dispatch(&ctx, &cmd).await?;
        }
    }
}

/// Drain queued lines to the socket until the connection is closed.
async fn write_loop(
    mut framed: FramedWrite<OwnedWriteHalf, LineCodec>,
    mut rx: mpsc::Receiver<String>,
    closed: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            Some(line) = rx.recv() => {
                if let Err(e) = framed.send(line).await {
                    debug!(error = %e, "Write failed, closing connection");
                    closed.cancel();
                    break;
                }
            }
            _ = closed.cancelled() => break,
        }
    }
}
