//! Welcome burst sent after registration.

use super::{Context, HandlerResult, server_reply};
use relay_proto::{ChannelModes, Response, UserModes};

/// Send the welcome burst (001-004 + MOTD) after successful registration.
pub async fn send_welcome_burst(ctx: &Context<'_>) -> HandlerResult {
    let info = &ctx.matrix.server_info;
    let server = info.name.as_str();
    let nick = ctx.user.nick.as_str();

    let mut burst = vec![
        server_reply(server, Response::RPL_WELCOME, [nick])
            .with_trailing(format!("Welcome to {server}, {}", ctx.user.prefix())),
        server_reply(server, Response::RPL_YOURHOST, [nick]).with_trailing(format!(
            "Your host is {server}, running version {}",
            info.version
        )),
        server_reply(server, Response::RPL_CREATED, [nick]).with_trailing(format!(
            "This server was created {}",
            info.created_at.format("%a %b %e %Y at %H:%M:%S UTC")
        )),
        server_reply(
            server,
            Response::RPL_MYINFO,
            [
                nick.to_string(),
                server.to_string(),
                info.version.clone(),
                UserModes::letters(),
                ChannelModes::letters(),
            ],
        ),
        server_reply(server, Response::RPL_MOTDSTART, [nick])
            .with_trailing(format!("- {server} Message of the day -")),
    ];
    for line in &info.motd {
        burst.push(
            server_reply(server, Response::RPL_MOTD, [nick]).with_trailing(format!("- {line}")),
        );
    }
    burst.push(server_reply(server, Response::RPL_ENDOFMOTD, [nick]).with_trailing("End of MOTD"));

    for reply in &burst {
        ctx.reply(reply).await?;
    }
    Ok(())
}
