//! PING and PONG handlers.

use super::{Context, Handler, HandlerResult};
use async_trait::async_trait;
use relay_proto::Command;
use std::time::Instant;
use tracing::debug;

/// Handler for PING command.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult {
        // PING <token>
        let token = cmd.param(0)?;

        let pong = Command::new("PONG").with_params([token]);
        ctx.reply(&pong).await
    }
}

/// Handler for PONG command.
///
/// Only a PONG naming this server answers an outstanding liveness PING.
pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult {
        let server = ctx.server_name();
        let matches = cmd.trailing.as_deref() == Some(server)
            || cmd.params.first().map(String::as_str) == Some(server);

        if matches {
            ctx.user.record_pong(Instant::now());
        } else {
            debug!(nick = %ctx.user.nick, "PONG for another origin ignored");
        }
        Ok(())
    }
}
