//! # relay-proto
//!
//! Wire-level building blocks for the relayd chat relay: the line grammar
//! (`[:prefix ]COMMAND [param ...][ :trailing]`), numeric reply codes, mode
//! flag sets and, with the `tokio` feature, a line framing codec.
//!
//! ```rust
//! use relay_proto::{parse, Command};
//!
//! let cmd = parse(":alice!a@host PRIVMSG #rust :hello there").unwrap();
//! assert_eq!(cmd.prefix.as_deref(), Some("alice!a@host"));
//! assert_eq!(cmd.name, "PRIVMSG");
//! assert_eq!(cmd.params, vec!["#rust"]);
//! assert_eq!(cmd.trailing.as_deref(), Some("hello there"));
//!
//! let line = Command::new("PONG").with_params(["irc.example"]).to_line();
//! assert_eq!(line, "PONG irc.example\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod mode;
pub mod response;

pub use self::chan::ChannelExt;
pub use self::command::{format, parse, Command};
pub use self::error::{ProtocolError, Result};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::mode::{ChannelModes, MemberModes, ModeDelta, UserModes};
pub use self::response::Response;
