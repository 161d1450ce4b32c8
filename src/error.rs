//! Unified error handling for relayd.
//!
//! Every failure while serving a connection ends up as a [`HandlerError`],
//! which the session loop treats as "terminate this connection". No error
//! numerics are sent to clients; the graceful path (liveness timeout) does
//! not go through these types at all.

use relay_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Registry lookups
// ============================================================================

/// Failures at the user/channel registry boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),
}

// ============================================================================
// Transport
// ============================================================================

/// Failures writing to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("lookup failed: {0}")]
    State(#[from] StateError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),
}

impl HandlerError {
    /// Get a static error code string for log labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Protocol(ProtocolError::MissingParameter { .. }) => "need_more_params",
            Self::Protocol(ProtocolError::MessageTooLong { .. }) => "line_too_long",
            Self::Protocol(_) => "protocol_error",
            Self::State(StateError::NoSuchNick(_)) => "no_such_nick",
            Self::State(StateError::NoSuchChannel(_)) => "no_such_channel",
            Self::State(StateError::NicknameInUse(_)) => "nickname_in_use",
            Self::Transport(_) => "send_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        let missing = HandlerError::from(ProtocolError::MissingParameter {
            command: "JOIN".into(),
            index: 0,
        });
        assert_eq!(missing.error_code(), "need_more_params");
        assert_eq!(
            HandlerError::from(StateError::NoSuchChannel("#x".into())).error_code(),
            "no_such_channel"
        );
        assert_eq!(
            HandlerError::from(TransportError::Closed).error_code(),
            "send_error"
        );
    }

    #[test]
    fn test_handler_error_display_wraps_source() {
        let err = HandlerError::from(StateError::NoSuchNick("ghost".into()));
        assert_eq!(err.to_string(), "lookup failed: no such nick: ghost");
    }
}
