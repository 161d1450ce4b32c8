//! Network module.
//!
//! Contains the Gateway (TCP listener), the per-connection session and the
//! outbound line sink.

mod connection;
mod gateway;
mod sink;

pub use connection::{Connection, PLACEHOLDER_NICK};
pub use gateway::Gateway;
pub use sink::{ConnectionSink, LineSink, OUTBOUND_QUEUE_SIZE, send};
