//! Error types for the relay protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Protocol-level failures: framing, decoding and malformed commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The line is not valid UTF-8.
    #[error("decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Message exceeded maximum allowed length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual message length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// The line carried no command name.
    #[error("missing command in line: {line:?}")]
    MissingCommand {
        /// The offending line.
        line: String,
    },

    /// A handler asked for a positional parameter the command does not have.
    #[error("{command}: missing parameter {index}")]
    MissingParameter {
        /// Command name.
        command: String,
        /// Zero-based parameter index.
        index: usize,
    },

    /// A mode change token was empty.
    #[error("invalid mode delta: {0:?}")]
    InvalidModeDelta(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_message_names_command() {
        let err = ProtocolError::MissingParameter {
            command: "JOIN".to_string(),
            index: 0,
        };
        assert_eq!(err.to_string(), "JOIN: missing parameter 0");
    }

    #[test]
    fn too_long_message_reports_limit() {
        let err = ProtocolError::MessageTooLong {
            actual: 600,
            limit: 512,
        };
        assert!(err.to_string().contains("limit: 512"));
    }
}
