//! Errors surfaced through the embedding API.

use thiserror::Error;

/// What can go wrong constructing, starting or stopping a [`Server`](crate::Server).
#[derive(Debug, Error)]
pub enum ServerError {
    /// The bind address did not parse as an IP address.
    #[error("invalid bind address")]
    InvalidAddress(#[from] std::net::AddrParseError),
    /// Binding the control port or building the runtime failed.
    #[error("server IO error")]
    Io(#[from] std::io::Error),
    /// `start` needs at least one worker thread.
    #[error("thread_count must be at least 1")]
    InvalidThreadCount,
    /// `start` was called twice.
    #[error("the server was already started")]
    AlreadyStarted,
}
