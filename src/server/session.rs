//! Per-connection session state. All fields are owned by the control loop
//! task and guarded by one async mutex; the data-transfer task is the only
//! other holder of the lock.

use crate::auth::{FtpUser, Permissions};
use crate::storage::{fold_ftp_path, Filesystem};
use std::fmt::Formatter;
use std::net::{SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

// TraceId is an identifier used to correlate log statements of one session.
#[derive(PartialEq, Eq, Debug)]
pub struct TraceId(u64);

impl TraceId {
    pub fn new() -> Self {
        TraceId(rand::random())
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SessionState {
    // Waiting for USER.
    New,
    // USER received, waiting for PASS.
    WaitPass,
    // Logged in, full command set available.
    WaitCmd,
}

// Keeps the server's open-connection gauge accurate: counts up on session
// creation and back down when the session is dropped, however that happens.
#[derive(Debug)]
pub struct ConnectionGuard {
    count: Arc<AtomicUsize>,
}

impl ConnectionGuard {
    pub fn new(count: Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard { count }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}

// The session shared between the control loop and the data-transfer task.
pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

// This is where we keep the state for an FTP session.
#[derive(Debug)]
pub struct Session {
    pub trace_id: TraceId,
    // The peer address of the control connection.
    pub source: SocketAddr,
    pub state: SessionState,
    // The username given to USER, pending its PASS.
    pub username: Option<String>,
    // The authenticated account. Some exactly when state is WaitCmd.
    pub user: Option<Arc<FtpUser>>,
    // Filesystem access rooted in the account's local root, created at login.
    pub storage: Option<Arc<Filesystem>>,
    // The FTP-virtual working directory, always absolute.
    pub cwd: PathBuf,
    // TYPE I vs TYPE A. ASCII is byte-transparent, so this only gates SIZE.
    pub binary_mode: bool,
    // After a RNFR command this holds the source path for the RNTO command.
    // Any other intervening command clears it.
    pub rename_from: Option<PathBuf>,
    // The starting byte for the next RETR, set by REST.
    pub start_pos: u64,
    // The passive-mode acceptor, bound by PASV, consumed by one transfer.
    pub data_listener: Option<tokio::net::TcpListener>,
    // The client endpoint given by PORT, consumed by one transfer.
    pub active_endpoint: Option<SocketAddrV4>,
    // Lets ABOR interrupt the data-transfer task.
    pub data_abort_tx: Option<mpsc::Sender<()>>,
    // True while a data transfer is in flight; suppresses the idle timeout.
    pub data_busy: bool,
    _connection: ConnectionGuard,
}

impl Session {
    pub fn new(source: SocketAddr, connection: ConnectionGuard) -> Self {
        Session {
            trace_id: TraceId::new(),
            source,
            state: SessionState::New,
            username: None,
            user: None,
            storage: None,
            cwd: "/".into(),
            binary_mode: false,
            rename_from: None,
            start_pos: 0,
            data_listener: None,
            active_endpoint: None,
            data_abort_tx: None,
            data_busy: false,
            _connection: connection,
        }
    }

    /// Resolves a client-supplied path against the working directory into a
    /// normalized FTP-virtual absolute path.
    pub fn ftp_absolute(&self, path: &str) -> PathBuf {
        fold_ftp_path(self.cwd.join(path))
    }

    pub fn permissions(&self) -> Permissions {
        self.user.as_ref().map(|user| user.permissions).unwrap_or(Permissions::NONE)
    }

    pub fn allows(&self, required: Permissions) -> bool {
        self.permissions().allows(required)
    }

    /// Completes a login: from here on the account's local root backs the
    /// virtual filesystem and the working directory is `/`.
    pub fn login(&mut self, user: Arc<FtpUser>) {
        self.storage = Some(Arc::new(Filesystem::new(user.local_root.clone())));
        self.username = Some(user.username.clone());
        self.user = Some(user);
        self.state = SessionState::WaitCmd;
        self.cwd = "/".into();
    }

    /// Returns the session to the state right after connecting. Used by REIN
    /// and by USER restarting the login handshake.
    pub fn logout(&mut self) {
        self.state = SessionState::New;
        self.username = None;
        self.user = None;
        self.storage = None;
        self.cwd = "/".into();
        self.binary_mode = false;
        self.rename_from = None;
        self.start_pos = 0;
        self.reset_data_channel();
    }

    /// Drops any prepared data channel and aborts an in-flight transfer.
    pub fn reset_data_channel(&mut self) {
        self.data_listener = None;
        self.active_endpoint = None;
        if let Some(abort) = self.data_abort_tx.take() {
            let _ = abort.try_send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_session() -> Session {
        let count = Arc::new(AtomicUsize::new(0));
        Session::new("127.0.0.1:21".parse().unwrap(), ConnectionGuard::new(count))
    }

    #[test]
    fn ftp_absolute_resolves_relative_to_cwd() {
        let mut session = test_session();
        session.cwd = "/docs".into();
        assert_eq!(session.ftp_absolute("a.txt"), PathBuf::from("/docs/a.txt"));
        assert_eq!(session.ftp_absolute("/a.txt"), PathBuf::from("/a.txt"));
        assert_eq!(session.ftp_absolute(".."), PathBuf::from("/"));
        assert_eq!(session.ftp_absolute("../../.."), PathBuf::from("/"));
    }

    #[test]
    fn connection_guard_counts_sessions() {
        let count = Arc::new(AtomicUsize::new(0));
        let session = Session::new("127.0.0.1:21".parse().unwrap(), ConnectionGuard::new(count.clone()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        drop(session);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
