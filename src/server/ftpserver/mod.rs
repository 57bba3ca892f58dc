//! The embeddable FTP server object.

mod error;
mod listen;

pub use error::ServerError;

use crate::auth::{Permissions, UserDatabase};
use crate::server::controlchan::LoopConfig;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const DEFAULT_GREETING: &str = "Welcome to the ftplet FTP server";
const DEFAULT_IDLE_SESSION_TIMEOUT_SECS: u64 = 600;

// How long stop() waits for worker threads to wind down after cancelling
// their tasks.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Called after every handled command with the command verb, its argument,
/// and the reply code and text the client got. For commands that run a data
/// transfer it also fires a second time with the terminal reply. Invoked
/// from worker threads, possibly several at once.
pub type FtpCommandCallback = Arc<dyn Fn(&str, &str, u32, &str) + Send + Sync + 'static>;

/// An embeddable FTP server.
///
/// The server is bound at construction time (so an OS-chosen port is known
/// right away) but does not accept connections until [`start`](Self::start)
/// is called. It owns its tokio runtime; embedders drive it with plain
/// blocking calls:
///
/// ```no_run
/// use ftplet::{auth::Permissions, Server};
///
/// let mut server = Server::bind("127.0.0.1", 0).unwrap();
/// server.add_anonymous("/srv/ftp/pub", Permissions::READ_ONLY);
/// server.start(2).unwrap();
/// println!("serving on port {}", server.port());
/// server.stop();
/// ```
pub struct Server {
    users: Option<UserDatabase>,
    greeting: String,
    logger: slog::Logger,
    idle_session_timeout: Duration,
    command_callback: Option<FtpCommandCallback>,
    std_listener: Option<std::net::TcpListener>,
    bound_addr: SocketAddr,
    runtime: Option<tokio::runtime::Runtime>,
    shutdown_tx: Option<watch::Sender<()>>,
    connections: Arc<AtomicUsize>,
}

impl Server {
    /// Binds the control listener on `address:port`. Use `"0.0.0.0"` to
    /// accept connections on any interface and port 0 to let the OS pick a
    /// free port; [`port`](Self::port) tells which one it chose.
    pub fn bind(address: &str, port: u16) -> Result<Server, ServerError> {
        let ip: std::net::IpAddr = address.parse()?;
        let listener = std::net::TcpListener::bind(SocketAddr::new(ip, port))?;
        let bound_addr = listener.local_addr()?;
        Ok(Server {
            users: Some(UserDatabase::new()),
            greeting: DEFAULT_GREETING.to_string(),
            logger: slog::Logger::root(slog::Discard, slog::o!()),
            idle_session_timeout: Duration::from_secs(DEFAULT_IDLE_SESSION_TIMEOUT_SECS),
            command_callback: None,
            std_listener: Some(listener),
            bound_addr,
            runtime: None,
            shutdown_tx: None,
            connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Sets the greeting sent in the 220 welcome line.
    pub fn greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Routes the server's log output through the given logger. The default
    /// discards everything.
    pub fn logger(mut self, logger: slog::Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Sets how long a session may sit idle before it is closed with a 421.
    /// A running data transfer does not count as idle.
    pub fn idle_session_timeout(mut self, timeout: Duration) -> Self {
        self.idle_session_timeout = timeout;
        self
    }

    /// Adds an account. Returns false when the username is taken, reserved,
    /// or the server was already started.
    pub fn add_user<P: AsRef<Path>>(&mut self, username: &str, password: &str, local_root: P, permissions: Permissions) -> bool {
        match self.users.as_mut() {
            Some(users) => users.add_user(username, password, local_root, permissions),
            None => false,
        }
    }

    /// Adds the password-less `anonymous`/`ftp` account. Returns false when
    /// already present or the server was already started.
    pub fn add_anonymous<P: AsRef<Path>>(&mut self, local_root: P, permissions: Permissions) -> bool {
        match self.users.as_mut() {
            Some(users) => users.add_anonymous(local_root, permissions),
            None => false,
        }
    }

    /// Registers the per-command observer. Must be called before
    /// [`start`](Self::start); later registrations go unused.
    pub fn set_command_callback(&mut self, callback: FtpCommandCallback) {
        self.command_callback = Some(callback);
    }

    /// Starts accepting connections on a fresh multi-threaded runtime with
    /// `thread_count` workers (at least 1).
    pub fn start(&mut self, thread_count: usize) -> Result<(), ServerError> {
        if thread_count == 0 {
            return Err(ServerError::InvalidThreadCount);
        }
        let std_listener = self.std_listener.take().ok_or(ServerError::AlreadyStarted)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(thread_count)
            .thread_name("ftplet-worker")
            .enable_all()
            .build()?;

        std_listener.set_nonblocking(true)?;
        let listener = {
            let _enter = runtime.enter();
            tokio::net::TcpListener::from_std(std_listener)?
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let config = LoopConfig {
            users: Arc::new(self.users.take().unwrap_or_default()),
            greeting: self.greeting.clone(),
            logger: self.logger.clone(),
            idle_session_timeout: self.idle_session_timeout,
            command_callback: self.command_callback.clone(),
            connections: self.connections.clone(),
        };
        runtime.spawn(listen::run(listener, config, shutdown_rx));

        self.shutdown_tx = Some(shutdown_tx);
        self.runtime = Some(runtime);
        slog::info!(self.logger, "Server started"; "address" => %self.bound_addr);
        Ok(())
    }

    /// Stops the server: the accept loop ends, outstanding session and
    /// transfer tasks are cancelled and their sockets closed. Clients are
    /// not notified. Returns once the worker threads have wound down.
    pub fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            drop(shutdown_tx);
        }
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
        }
        slog::info!(self.logger, "Server stopped");
    }

    /// The number of currently open control connections.
    pub fn open_connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// The control port the server is bound to. Meaningful mainly when the
    /// server was created with port 0.
    pub fn port(&self) -> u16 {
        self.bound_addr.port()
    }

    /// The address the server is bound to.
    pub fn address(&self) -> String {
        self.bound_addr.ip().to_string()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop();
    }
}
