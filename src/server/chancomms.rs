//! Messages exchanged between the control loop and the data-transfer task.

use crate::storage;
use std::fmt;

// The transfer the control loop hands to the data task. Files are opened by
// the command handler so that open failures are reported before the data
// connection is touched.
pub enum DataChanCmd {
    Retr { file: tokio::fs::File, path: String },
    Stor { file: tokio::fs::File, path: String },
    Appe { file: tokio::fs::File, path: String },
    Stou { file: tokio::fs::File, filename: String },
    List { data: Vec<u8> },
    Nlst { data: Vec<u8> },
}

impl fmt::Debug for DataChanCmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataChanCmd::Retr { path, .. } => write!(f, "RETR {}", path),
            DataChanCmd::Stor { path, .. } => write!(f, "STOR {}", path),
            DataChanCmd::Appe { path, .. } => write!(f, "APPE {}", path),
            DataChanCmd::Stou { filename, .. } => write!(f, "STOU {}", filename),
            DataChanCmd::List { .. } => write!(f, "LIST"),
            DataChanCmd::Nlst { .. } => write!(f, "NLST"),
        }
    }
}

/// Messages the data task (and QUIT) send back to the control loop.
#[derive(Debug)]
pub enum ControlChanMsg {
    /// Data was successfully sent to the client during a RETR.
    SentData {
        /// The path as specified by the client.
        path: String,
        /// The number of bytes transferred.
        bytes: u64,
    },
    /// Data from the client was written to disk (STOR/APPE).
    WrittenData {
        /// The path as specified by the client.
        path: String,
        /// The number of bytes transferred.
        bytes: u64,
    },
    /// A STOU upload finished under the server-chosen name.
    StoredUnique {
        /// The unique name picked by the server.
        filename: String,
        /// The number of bytes transferred.
        bytes: u64,
    },
    /// Listed the directory successfully.
    DirectorySuccessfullyListed,
    /// The data connection could not be established.
    CouldNotConnect,
    /// The data connection broke mid-transfer.
    ConnectionReset,
    /// A filesystem error while the transfer was running.
    StorageError(storage::Error),
    /// Quit the client connection.
    ExitControlLoop,
}

impl fmt::Display for ControlChanMsg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
