//! Filesystem access for FTP sessions: path resolution rooted in a user's
//! local root, file streams for transfers and directory snapshots for
//! listings.

mod error;
mod fileinfo;
mod filesystem;

pub use error::{Error, ErrorKind};
pub use fileinfo::Fileinfo;
pub use filesystem::{fold_ftp_path, Filesystem};

/// Result type used by this module.
pub type Result<T> = std::result::Result<T, Error>;
