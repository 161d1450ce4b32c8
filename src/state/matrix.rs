//! The Matrix - Central shared state for the relay.
//!
//! The Matrix holds all users, channels and server identity in concurrent
//! data structures accessible from any async task.

use super::{ChannelRegistry, User, UserRegistry};
use crate::config::{Config, LivenessConfig};
use crate::network::{LineSink, send};
use chrono::{DateTime, Utc};
use relay_proto::Command;
use std::sync::Arc;
use tracing::{debug, info};

/// Server identity information.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub motd: Vec<String>,
}

/// The Matrix - Central shared state container.
#[derive(Debug)]
pub struct Matrix {
    /// All registered users, by nickname.
    pub users: UserRegistry,

    /// All channels, by name.
    pub channels: ChannelRegistry,

    /// This server's identity.
    pub server_info: ServerInfo,

    /// Keepalive timings used by the liveness task.
    pub liveness: LivenessConfig,
}

impl Matrix {
    /// Create a new Matrix with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            users: UserRegistry::new(),
            channels: ChannelRegistry::new(),
            server_info: ServerInfo {
                name: config.server.name.clone(),
                version: format!("relayd-{}", env!("CARGO_PKG_VERSION")),
                created_at: Utc::now(),
                motd: config.server.motd.clone(),
            },
            liveness: config.liveness.clone(),
        }
    }

    /// Shorthand for the server name used as reply prefix.
    pub fn server_name(&self) -> &str {
        &self.server_info.name
    }

    /// Send `ERROR :<reason>`, close the connection and drop the user.
    ///
    /// The ERROR line is best effort. Removal only affects the registry entry
    /// belonging to this exact session. Channel membership is left as is.
    pub async fn disconnect_user(&self, user: &Arc<User>, reason: &str) {
        let error = Command::new("ERROR").with_trailing(reason);
        if let Err(e) = send(user.as_ref(), &error).await {
            debug!(nick = %user.nick, error = %e, "ERROR line not delivered");
        }
        user.close();
        if self.users.remove_session(user) {
            info!(nick = %user.nick, reason, "User disconnected");
        }
    }
}
