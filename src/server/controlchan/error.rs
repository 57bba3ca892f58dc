//! The error type of the control channel.

use thiserror::Error;

/// Everything that can go wrong while reading, parsing or answering a
/// command. IO failures tear the session down; the rest map to a syntax
/// reply and the session continues.
#[derive(Debug, Error)]
pub enum ControlChanError {
    /// IO failure on the command socket.
    #[error("failed to perform IO on the control channel")]
    Io(#[from] std::io::Error),
    /// A command contained bytes that are not valid UTF-8.
    #[error("non-UTF8 character in command")]
    Utf8,
    /// A known verb with an argument we cannot make sense of.
    #[error("invalid argument to {verb}")]
    InvalidArgument {
        /// The verb whose argument did not parse.
        verb: String,
    },
    /// The session sat idle for longer than the configured timeout.
    #[error("control channel idle timeout")]
    Timeout,
}
