//! State management module.
//!
//! Contains the Matrix (shared server state) and the user and channel
//! registries it is built from.

mod channel;
mod dashmap_ext;
mod matrix;
mod user;

pub use channel::{Channel, ChannelRegistry};
pub use matrix::{Matrix, ServerInfo};
pub use user::{User, UserParams, UserRegistry, UserState};
