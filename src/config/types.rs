//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Ping/pong keepalive configuration.
    #[serde(default)]
    pub liveness: LivenessConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.liveness.check_interval == 0 {
            return Err(ConfigError::Invalid(
                "liveness.check_interval must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Advertised server name, used as reply prefix and PING payload.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Message of the day, one entry per line.
    #[serde(default = "default_motd")]
    pub motd: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            motd: default_motd(),
        }
    }
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
    /// Longest accepted line in bytes, terminator included.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
            max_line_length: default_max_line_length(),
        }
    }
}

/// Idle timeout configuration for client connection keepalive.
///
/// Every `check_interval` seconds each user is inspected. A user idle for
/// more than `idle_timeout` seconds is sent a PING; one that has not answered
/// within `pong_timeout` seconds is disconnected with "Ping timeout".
#[derive(Debug, Clone, Deserialize)]
pub struct LivenessConfig {
    /// Seconds between liveness sweeps (default: 30).
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Seconds of idle before sending PING to client (default: 300).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,

    /// Seconds to wait for PONG after sending PING before disconnect (default: 30).
    #[serde(default = "default_pong_timeout")]
    pub pong_timeout: u64,
}

impl LivenessConfig {
    /// Sweep period, never shorter than one second.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.max(1))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout)
    }

    pub fn pong_timeout(&self) -> Duration {
        Duration::from_secs(self.pong_timeout)
    }
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            idle_timeout: default_idle_timeout(),
            pong_timeout: default_pong_timeout(),
        }
    }
}

fn default_server_name() -> String {
    "irc.relay.local".to_string()
}

fn default_motd() -> Vec<String> {
    vec!["Welcome to relayd.".to_string()]
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 6667))
}

fn default_max_line_length() -> usize {
    relay_proto::line::DEFAULT_MAX_LINE_LEN
}

fn default_check_interval() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_pong_timeout() -> u64 {
    30
}
