//! The per-session control loop: wraps an accepted socket in the FTP codec,
//! assembles the middleware chain and pumps events through it until the peer
//! leaves, QUIT is acknowledged or a fatal error ends the session.

use super::auth::AuthMiddleware;
use super::codec::FtpCodec;
use super::command::{Command, ParsedCommand};
use super::error::ControlChanError;
use super::event::Event;
use super::handler::{storage_error_reply, CommandContext, CommandHandler};
use super::handlers;
use super::log::LoggingMiddleware;
use super::middleware::ControlChanMiddleware;
use super::notify::CommandObserverMiddleware;
use super::reply::{Reply, ReplyCode};
use crate::auth::UserDatabase;
use crate::server::chancomms::ControlChanMsg;
use crate::server::ftpserver::FtpCommandCallback;
use crate::server::session::{ConnectionGuard, Session, SharedSession};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio::sync::Mutex;
use tokio_util::codec::Decoder;

// Room for the terminal message of a data transfer plus a QUIT without ever
// blocking a sender against the loop that drains them.
const INTERNAL_MSG_QUEUE_SIZE: usize = 8;

// What a session needs to know about the server it belongs to.
#[derive(Clone)]
pub struct LoopConfig {
    pub users: Arc<UserDatabase>,
    pub greeting: String,
    pub logger: slog::Logger,
    pub idle_session_timeout: Duration,
    pub command_callback: Option<FtpCommandCallback>,
    pub connections: Arc<AtomicUsize>,
}

/// Builds a session around an accepted control connection and spawns its
/// event loop.
pub async fn spawn_loop(config: LoopConfig, tcp_stream: TcpStream) -> Result<(), ControlChanError> {
    let LoopConfig {
        users,
        greeting,
        logger,
        idle_session_timeout,
        command_callback,
        connections,
    } = config;

    let local_addr = tcp_stream.local_addr()?;
    let peer_addr = tcp_stream.peer_addr()?;
    let (control_msg_tx, mut control_msg_rx): (Sender<ControlChanMsg>, Receiver<ControlChanMsg>) = channel(INTERNAL_MSG_QUEUE_SIZE);

    let session = Session::new(peer_addr, ConnectionGuard::new(connections));
    let logger = logger.new(slog::o!("trace-id" => format!("{}", session.trace_id), "source" => format!("{}", session.source)));
    let shared_session: SharedSession = Arc::new(Mutex::new(session));

    let event_chain = PrimaryEventHandler {
        logger: logger.clone(),
        session: shared_session.clone(),
        users,
        local_addr,
        tx_control_chan: control_msg_tx,
    };
    let event_chain = AuthMiddleware {
        session: shared_session.clone(),
        next: event_chain,
    };
    let event_chain = CommandObserverMiddleware {
        callback: command_callback,
        last_command: String::new(),
        last_argument: String::new(),
        next: event_chain,
    };
    let mut event_chain = LoggingMiddleware {
        logger: logger.clone(),
        sequence_nr: 0,
        next: event_chain,
    };

    let (mut reply_sink, mut command_source) = FtpCodec::new().framed(tcp_stream).split();
    reply_sink.send(Reply::new_with_string(ReplyCode::ServiceReady, greeting)).await?;

    tokio::spawn(async move {
        slog::info!(logger, "Starting control loop");
        loop {
            let mut timeout_delay = Box::pin(tokio::time::sleep(idle_session_timeout));
            // Internal messages take priority over freshly arrived commands:
            // the exit message queued by QUIT must end the session before a
            // pipelined command could produce another reply, and a terminal
            // transfer reply goes out before the next command is handled.
            let incoming: Option<Result<Event, ControlChanError>> = tokio::select! {
                biased;
                msg = control_msg_rx.recv() => msg.map(|msg| Ok(Event::InternalMsg(msg))),
                cmd_result = command_source.next() => match cmd_result {
                    Some(result) => Some(result.map(Event::Command)),
                    None => {
                        slog::info!(logger, "Control connection closed by peer");
                        return;
                    }
                },
                _ = &mut timeout_delay => {
                    // A running transfer keeps the session alive.
                    let data_busy = { shared_session.lock().await.data_busy };
                    if data_busy { None } else { Some(Err(ControlChanError::Timeout)) }
                }
            };
            match incoming {
                None => {}
                Some(Ok(Event::InternalMsg(ControlChanMsg::ExitControlLoop))) => {
                    slog::info!(logger, "Exiting control loop");
                    return;
                }
                Some(Ok(event)) => match event_chain.handle(event).await {
                    Ok(reply) => {
                        if let Err(err) = reply_sink.send(reply).await {
                            slog::warn!(logger, "Could not send reply to the client: {}", err);
                            return;
                        }
                    }
                    Err(error) => {
                        slog::warn!(logger, "Fatal error handling event: {}. Closing control connection", error);
                        return;
                    }
                },
                Some(Err(error)) => {
                    let (reply, close_connection) = handle_control_channel_error(&logger, error);
                    if let Reply::None = reply {
                        // An IO failure; nothing sensible left to say.
                    } else if reply_sink.send(reply).await.is_err() {
                        slog::warn!(logger, "Could not send error reply to the client");
                        return;
                    }
                    if close_connection {
                        return;
                    }
                }
            }
        }
    });

    Ok(())
}

// Picks the reply for a control channel error and tells whether the session
// is over. Bad commands never kill the session; bad sockets do.
fn handle_control_channel_error(logger: &slog::Logger, error: ControlChanError) -> (Reply, bool) {
    slog::warn!(logger, "Control channel error: {}", error);
    match error {
        ControlChanError::Utf8 => (Reply::new(ReplyCode::ParameterSyntaxError, "Invalid character in command"), false),
        ControlChanError::InvalidArgument { .. } => (Reply::new(ReplyCode::ParameterSyntaxError, "Invalid argument"), false),
        ControlChanError::Timeout => (
            Reply::new(ReplyCode::ServiceNotAvailable, "Session timed out. Closing control connection"),
            true,
        ),
        ControlChanError::Io(_) => (Reply::none(), true),
    }
}

// The end of the middleware chain: dispatches commands to their handlers and
// turns internal messages into replies.
struct PrimaryEventHandler {
    logger: slog::Logger,
    session: SharedSession,
    users: Arc<UserDatabase>,
    local_addr: SocketAddr,
    tx_control_chan: Sender<ControlChanMsg>,
}

impl PrimaryEventHandler {
    async fn handle_command(&self, parsed: ParsedCommand) -> Result<Reply, ControlChanError> {
        // RNFR pairs with the directly following RNTO, and a REST offset
        // holds until the next transfer command. Anything else in between
        // invalidates them.
        {
            let mut session = self.session.lock().await;
            if !matches!(parsed.command, Command::Rnfr { .. } | Command::Rnto { .. }) {
                session.rename_from = None;
            }
            if !matches!(
                parsed.command,
                Command::Rest { .. } | Command::Retr { .. } | Command::Stor { .. } | Command::Appe { .. }
            ) {
                session.start_pos = 0;
            }
        }

        let args = CommandContext {
            session: self.session.clone(),
            users: self.users.clone(),
            local_addr: self.local_addr,
            tx_control_chan: self.tx_control_chan.clone(),
            logger: self.logger.clone(),
        };

        let handler: Box<dyn CommandHandler> = match parsed.command {
            Command::User { username } => Box::new(handlers::User::new(username)),
            Command::Pass { password } => Box::new(handlers::Pass::new(password)),
            Command::Acct => Box::new(handlers::Acct),
            Command::Quit => Box::new(handlers::Quit),
            Command::Rein => Box::new(handlers::Rein),
            Command::Cwd { path } => Box::new(handlers::Cwd::new(path)),
            Command::Cdup => Box::new(handlers::Cdup),
            Command::Pwd => Box::new(handlers::Pwd),
            Command::Type { param } => Box::new(handlers::Type::new(param)),
            Command::Stru { param } => Box::new(handlers::Stru::new(param)),
            Command::Mode { param } => Box::new(handlers::Mode::new(param)),
            Command::Port { host, port } => Box::new(handlers::Port::new(host, port)),
            Command::Pasv => Box::new(handlers::Pasv),
            Command::Retr { path } => Box::new(handlers::Retr::new(path)),
            Command::Stor { path } => Box::new(handlers::Stor::new(path)),
            Command::Stou { path } => Box::new(handlers::Stou::new(path)),
            Command::Appe { path } => Box::new(handlers::Appe::new(path)),
            Command::Rest { offset } => Box::new(handlers::Rest::new(offset)),
            Command::Size { path } => Box::new(handlers::Size::new(path)),
            Command::Rnfr { path } => Box::new(handlers::Rnfr::new(path)),
            Command::Rnto { path } => Box::new(handlers::Rnto::new(path)),
            Command::Abor => Box::new(handlers::Abor),
            Command::Dele { path } => Box::new(handlers::Dele::new(path)),
            Command::Rmd { path } => Box::new(handlers::Rmd::new(path)),
            Command::Mkd { path } => Box::new(handlers::Mkd::new(path)),
            Command::List { path } => Box::new(handlers::List::new(path)),
            Command::Nlst { path } => Box::new(handlers::Nlst::new(path)),
            Command::Site => Box::new(handlers::Site),
            Command::Syst => Box::new(handlers::Syst),
            Command::Stat => Box::new(handlers::Stat),
            Command::Help => Box::new(handlers::Help),
            Command::Noop => Box::new(handlers::Noop),
            Command::Allo => Box::new(handlers::Allo),
            Command::Feat => Box::new(handlers::Feat),
            Command::Opts { param } => Box::new(handlers::Opts::new(param)),
            Command::Other => {
                return Ok(Reply::new_with_string(
                    ReplyCode::CommandSyntaxError,
                    format!("Command '{}' not implemented", parsed.verb),
                ));
            }
        };

        handler.handle(args).await
    }

    async fn handle_internal_msg(&self, msg: ControlChanMsg) -> Result<Reply, ControlChanError> {
        use ControlChanMsg::*;

        match msg {
            SentData { path, bytes } => {
                slog::info!(self.logger, "Sent {} bytes of {}", bytes, path);
                Ok(Reply::new(ReplyCode::ClosingDataConnection, "Closing data connection"))
            }
            WrittenData { path, bytes } => {
                slog::info!(self.logger, "Wrote {} bytes to {}", bytes, path);
                Ok(Reply::new(ReplyCode::ClosingDataConnection, "Closing data connection"))
            }
            StoredUnique { filename, bytes } => {
                slog::info!(self.logger, "Wrote {} bytes to unique file {}", bytes, filename);
                Ok(Reply::new_with_string(ReplyCode::ClosingDataConnection, format!("FILE: {}", filename)))
            }
            DirectorySuccessfullyListed => Ok(Reply::new(ReplyCode::ClosingDataConnection, "Closing data connection")),
            CouldNotConnect => Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection")),
            ConnectionReset => Ok(Reply::new(ReplyCode::ConnectionClosed, "Connection closed; transfer aborted")),
            StorageError(err) => Ok(storage_error_reply(err)),
            // Handled by the loop before the chain runs; kept total anyway.
            ExitControlLoop => Ok(Reply::none()),
        }
    }
}

#[async_trait]
impl ControlChanMiddleware for PrimaryEventHandler {
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError> {
        match event {
            Event::Command(parsed) => self.handle_command(parsed).await,
            Event::InternalMsg(msg) => self.handle_internal_msg(msg).await,
        }
    }
}
