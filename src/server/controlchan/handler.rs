use super::error::ControlChanError;
use super::reply::{Reply, ReplyCode};
use crate::auth::{Permissions, UserDatabase};
use crate::server::chancomms::ControlChanMsg;
use crate::server::session::{Session, SharedSession};
use crate::storage::Filesystem;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

// Common interface for all handlers of `Command`s
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError>;
}

/// Represents arguments passed to a `CommandHandler`
pub struct CommandContext {
    pub session: SharedSession,
    pub users: Arc<UserDatabase>,
    // The local address of the control connection; PASV binds its acceptor
    // on this interface.
    pub local_addr: SocketAddr,
    pub tx_control_chan: Sender<ControlChanMsg>,
    pub logger: slog::Logger,
}

// The uniform rejection for a command whose permission bits are not granted.
pub fn check_permission(session: &Session, required: Permissions) -> Result<(), Reply> {
    if session.allows(required) {
        Ok(())
    } else {
        Err(Reply::new(ReplyCode::FileError, "Permission denied"))
    }
}

// The storage backend, present from login onward. The auth middleware keeps
// filesystem commands away from logged-out sessions, so a miss here is a bug
// rather than a client error, but we still answer it politely.
pub fn storage_of(session: &Session) -> Result<Arc<Filesystem>, Reply> {
    session.storage.clone().ok_or_else(|| Reply::new(ReplyCode::NotLoggedIn, "Not logged in"))
}

/// Maps a filesystem failure onto the FTP reply the client gets for it.
pub fn storage_error_reply(err: crate::storage::Error) -> Reply {
    use crate::storage::ErrorKind;
    match err.kind() {
        ErrorKind::TransientFileNotAvailable => Reply::new(ReplyCode::TransientFileError, "File unavailable"),
        ErrorKind::PermanentFileNotAvailable => Reply::new(ReplyCode::FileError, "File not found"),
        ErrorKind::PermissionDenied => Reply::new(ReplyCode::FileError, "Permission denied"),
        ErrorKind::LocalError => Reply::new(ReplyCode::LocalError, "Local error"),
    }
}

// 257 replies carry the path in quotes, with embedded quotes doubled.
pub fn quote_ftp_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_ftp_path;
    use pretty_assertions::assert_eq;

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_ftp_path("/"), "\"/\"");
        assert_eq!(quote_ftp_path("/a\"b"), "\"/a\"\"b\"");
    }
}
