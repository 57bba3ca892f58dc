#![deny(missing_docs)]
//! An embeddable FTP server library for Rust
//!
//! ftplet speaks RFC 959 (plus the SIZE, REST and UTF8 extensions) and
//! mediates all file and directory access through a per-user local root and a
//! permission bitset, which makes it suitable for embedding in applications
//! that need to expose a directory over FTP without running a system-wide
//! daemon.
//!
//! # Quick Start
//!
//! ```no_run
//! use ftplet::{auth::Permissions, Server};
//!
//! let mut server = Server::bind("127.0.0.1", 2121).unwrap();
//! server.add_user("alice", "secret", "/srv/ftp/alice", Permissions::ALL);
//! server.add_anonymous("/srv/ftp/pub", Permissions::READ_ONLY);
//! server.start(4).unwrap();
//! // ... the server now accepts connections on its own worker threads ...
//! server.stop();
//! ```

pub mod auth;
pub(crate) mod server;
pub(crate) mod storage;

pub use crate::server::ftpserver::{FtpCommandCallback, Server, ServerError};
