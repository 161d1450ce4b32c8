//! relayd - a minimal chat relay speaking a line-based IRC dialect.
//!
//! Clients register with NICK/USER, join channels and relay PRIVMSG to the
//! other members. Idle clients are pinged and dropped when they stop
//! answering.

pub mod config;
pub mod error;
pub mod handlers;
pub mod liveness;
pub mod network;
pub mod state;
pub mod telemetry;

#[cfg(test)]
mod test_support;
