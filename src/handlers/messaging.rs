//! PRIVMSG command handler.

use super::{Context, Handler, HandlerResult, deliver};
use async_trait::async_trait;
use relay_proto::{ChannelExt, Command};
use tracing::debug;

/// Handler for PRIVMSG command.
///
/// Channel messages are relayed to every member except the sender. Direct
/// messages to nicknames are not routed.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult {
        // PRIVMSG <target> :<text>
        let target = cmd.param(0)?;
        if !target.is_channel_name() {
            debug!(from = %ctx.user.nick, to = %target, "Direct message dropped");
            return Ok(());
        }

        // A single-word text arrives as a plain parameter.
        let text = match cmd.trailing.as_deref() {
            Some(text) => text,
            None => cmd.param(1)?,
        };

        let channel = ctx.matrix.channels.get(target)?;
        let relay = Command::new("PRIVMSG")
            .with_prefix(ctx.user.prefix())
            .with_params([target])
            .with_trailing(text);

        for member in channel.members() {
            if member == ctx.user.nick {
                continue;
            }
            match ctx.matrix.users.find(&member) {
                Some(recipient) => deliver(&recipient, &relay).await,
                None => debug!(nick = %member, channel = %target, "Skipping member no longer registered"),
            }
        }
        Ok(())
    }
}
