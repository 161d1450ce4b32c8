//! Helper functions shared by handlers.

use crate::network::send;
use crate::state::User;
use relay_proto::{Command, Response};
use tracing::warn;

/// Build a numeric reply prefixed with the server name.
pub fn server_reply<I, S>(server_name: &str, response: Response, params: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Command::response(response)
        .with_prefix(server_name)
        .with_params(params)
}

/// Send a line to a user other than the one being served.
///
/// A failed write belongs to the recipient's connection, not the sender's,
/// so it is logged and swallowed.
pub async fn deliver(recipient: &User, command: &Command) {
    if let Err(e) = send(recipient, command).await {
        warn!(nick = %recipient.nick, command = %command.name, error = %e, "Delivery failed");
    }
}
