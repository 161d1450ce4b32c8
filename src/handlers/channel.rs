//! JOIN command handler.

use super::{Context, Handler, HandlerResult, deliver, server_reply};
use crate::state::Matrix;
use async_trait::async_trait;
use relay_proto::{Command, MemberModes, Response};
use tracing::{debug, info};

/// Handler for JOIN command.
///
/// The first joiner creates the channel and becomes its operator. Later
/// joiners are appended to the member list; a joiner that already holds
/// operator status has it re-announced to the whole channel.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult {
        // JOIN <channel>
        let name = cmd.param(0)?;
        let user = ctx.user;
        let nick = user.nick.as_str();

        let (channel, created) = ctx.matrix.channels.get_or_create(name, nick);
        let op_line = Command::new("MODE")
            .with_prefix(user.prefix())
            .with_params([name, "+o", nick]);

        if created {
            info!(channel = %name, founder = %nick, "Channel created");
            ctx.reply(&op_line).await?;
        } else {
            let modes = channel.join(nick);
            if modes.contains(MemberModes::OPERATOR) {
                // Snapshot taken after the membership lock is released.
                fan_out(ctx.matrix, &channel.members(), &op_line).await;
            }
        }
        user.join_channel(name);

        let join = Command::new("JOIN")
            .with_prefix(user.prefix())
            .with_params([name]);
        fan_out(ctx.matrix, &channel.members(), &join).await;

        let names = server_reply(
            ctx.server_name(),
            Response::RPL_NAMREPLY,
            [nick, "=", name],
        )
        .with_trailing(channel.names());
        ctx.reply(&names).await?;

        let end = server_reply(ctx.server_name(), Response::RPL_ENDOFNAMES, [nick, name])
            .with_trailing("End of users list");
        ctx.reply(&end).await
    }
}

/// Send `command` to every listed member that is still registered.
async fn fan_out(matrix: &Matrix, members: &[String], command: &Command) {
    for member in members {
        match matrix.users.find(member) {
            Some(recipient) => deliver(&recipient, command).await,
            None => debug!(nick = %member, "Skipping member no longer registered"),
        }
    }
}
