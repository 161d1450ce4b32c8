//! The line grammar: decoding lines into [`Command`]s and encoding them back.
//!
//! The encoder has one deliberate quirk: a trailing field without an embedded
//! space is written as a plain parameter (no `:` marker). Peers therefore see
//! `PRIVMSG #chan hello` for a single-word message and
//! `PRIVMSG #chan :hello there` otherwise.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtocolError, Result};
use crate::response::Response;

/// Marker introducing the trailing field.
const TRAILING_MARKER: &str = " :";

/// A decoded protocol line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Command {
    /// Origin of the line (`nick!user@host` or a server name).
    pub prefix: Option<String>,
    /// Upper-case command name or three-digit numeric.
    pub name: String,
    /// Positional parameters, in order.
    pub params: Vec<String>,
    /// Free-text final parameter; may contain spaces.
    pub trailing: Option<String>,
}

impl Command {
    /// Create a command with no prefix, parameters or trailing field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a numeric reply.
    pub fn response(response: Response) -> Self {
        Self::new(response.to_string())
    }

    /// Set the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Replace the positional parameters.
    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the trailing field.
    #[must_use]
    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = Some(trailing.into());
        self
    }

    /// Positional parameter `index`, or [`ProtocolError::MissingParameter`].
    pub fn param(&self, index: usize) -> Result<&str> {
        self.params
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ProtocolError::MissingParameter {
                command: self.name.clone(),
                index,
            })
    }

    /// Encode as a CRLF-terminated wire line.
    pub fn to_line(&self) -> String {
        format(
            &self.name,
            self.prefix.as_deref(),
            &self.params,
            self.trailing.as_deref(),
        )
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_line().trim_end_matches("\r\n"))
    }
}

/// Decode one line.
///
/// Trailing CR/LF is ignored. The prefix is everything between a leading `:`
/// and the first space; the trailing field is everything after the first
/// `" :"`; the rest is split on spaces into the command name and parameters.
pub fn parse(line: &str) -> Result<Command> {
    let mut rest = line.trim_end_matches(['\r', '\n']);

    let mut prefix = None;
    if let Some(stripped) = rest.strip_prefix(':') {
        match stripped.split_once(' ') {
            Some((origin, remainder)) => {
                prefix = Some(origin.to_string());
                rest = remainder;
            }
            None => {
                return Err(ProtocolError::MissingCommand {
                    line: line.to_string(),
                });
            }
        }
    }

    let mut trailing = None;
    if let Some((head, tail)) = rest.split_once(TRAILING_MARKER) {
        trailing = Some(tail.to_string());
        rest = head;
    }

    let mut tokens = rest.split(' ').filter(|token| !token.is_empty());
    let name = tokens
        .next()
        .ok_or_else(|| ProtocolError::MissingCommand {
            line: line.to_string(),
        })?
        .to_ascii_uppercase();
    let params = tokens.map(str::to_string).collect();

    Ok(Command {
        prefix,
        name,
        params,
        trailing,
    })
}

/// Encode one line, CRLF-terminated.
///
/// Empty prefix, parameter list and trailing field are omitted entirely.
pub fn format<S: AsRef<str>>(
    name: &str,
    prefix: Option<&str>,
    params: &[S],
    trailing: Option<&str>,
) -> String {
    let mut line = String::with_capacity(64);

    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        line.push(':');
        line.push_str(prefix);
        line.push(' ');
    }

    line.push_str(name);

    for param in params {
        line.push(' ');
        line.push_str(param.as_ref());
    }

    if let Some(trailing) = trailing.filter(|t| !t.is_empty()) {
        if trailing.contains(' ') {
            line.push_str(TRAILING_MARKER);
        } else {
            line.push(' ');
        }
        line.push_str(trailing);
    }

    line.push_str("\r\n");
    line
}
