//! Command handlers.
//!
//! This module contains the Handler trait and command registry for dispatching
//! incoming lines from registered users to the appropriate handler.

mod channel;
mod connection;
mod helpers;
mod messaging;
mod mode;
mod welcome;

pub use channel::JoinHandler;
pub use connection::{PingHandler, PongHandler};
pub use helpers::{deliver, server_reply};
pub use messaging::PrivmsgHandler;
pub use mode::ModeHandler;
pub use welcome::send_welcome_burst;

pub use crate::error::{HandlerError, HandlerResult};

use crate::network::send;
use crate::state::{Matrix, User};
use crate::telemetry::{CommandTimer, spans};
use async_trait::async_trait;
use relay_proto::Command;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Instrument, debug};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The user that issued the command.
    pub user: &'a Arc<User>,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
}

impl Context<'_> {
    /// The advertised server name.
    pub fn server_name(&self) -> &str {
        self.matrix.server_name()
    }

    /// Send a line to the issuing user. Failure ends the connection.
    pub async fn reply(&self, command: &Command) -> HandlerResult {
        send(self.user.as_ref(), command).await?;
        Ok(())
    }
}

/// Trait implemented by all command handlers.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle an incoming command.
    async fn handle(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult;
}

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Keepalive
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("PONG", Box::new(PongHandler));

        // Channel and user state
        handlers.insert("MODE", Box::new(ModeHandler));
        handlers.insert("JOIN", Box::new(JoinHandler));

        // Messaging
        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));

        Self { handlers }
    }

    /// True if a handler exists for `name`.
    pub fn handles(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Dispatch a command to the appropriate handler.
    ///
    /// Unknown commands are dropped without a reply.
    pub async fn dispatch(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult {
        let Some(handler) = self.handlers.get(cmd.name.as_str()) else {
            debug!(command = %cmd.name, "Unknown command dropped");
            return Ok(());
        };

        let span = spans::command(
            &cmd.name,
            &ctx.user.nick,
            cmd.params.first().map(String::as_str),
        );
        let _timer = CommandTimer::new(cmd.name.as_str());
        handler.handle(ctx, cmd).instrument(span).await
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
