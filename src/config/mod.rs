//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, ListenConfig, LivenessConfig)

mod types;

pub use types::{Config, ConfigError, ListenConfig, LivenessConfig, ServerConfig};
