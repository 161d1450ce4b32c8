//! MODE command handler.
//!
//! Channel targets get an empty RPL_CHANNELMODEIS; channel modes are neither
//! read nor changed. User targets accept a single delta token, of which only
//! `+i` has an effect.

use super::{Context, Handler, HandlerResult, server_reply};
use async_trait::async_trait;
use relay_proto::{ChannelExt, Command, ModeDelta, Response, UserModes};
use tracing::debug;

/// Handler for MODE command.
pub struct ModeHandler;

#[async_trait]
impl Handler for ModeHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &Command) -> HandlerResult {
        // MODE <target> [<delta>]
        let target = cmd.param(0)?;

        if target.is_channel_name() {
            let reply = server_reply(
                ctx.server_name(),
                Response::RPL_CHANNELMODEIS,
                [ctx.user.nick.as_str(), target],
            );
            return ctx.reply(&reply).await;
        }

        let target_user = ctx.matrix.users.get(target)?;
        let delta = ModeDelta::parse(cmd.param(1)?)?;
        if !delta.adding {
            return Ok(());
        }

        for letter in delta.letters.chars() {
            match letter {
                'i' => target_user.add_modes(UserModes::INVISIBLE),
                other => debug!(nick = %target_user.nick, mode = %other, "User mode ignored"),
            }
        }
        Ok(())
    }
}
