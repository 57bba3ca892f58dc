//! The RFC 959 Passive (`PASV`) command
//
// Binds a fresh acceptor on the interface the control connection came in on
// and tells the client where to connect. The acceptor takes exactly one
// connection, for the next transfer command; after that (or on session
// reset) it is gone and a new PASV is needed.
//
// The advertised address is the control socket's local IPv4 address. Clients
// behind NAT that cannot reach it need external address rewriting, which is
// out of scope here.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;
use std::net::IpAddr;
use tokio::net::TcpListener;

pub struct Pasv;

#[async_trait]
impl CommandHandler for Pasv {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let ip = match args.local_addr.ip() {
            IpAddr::V4(ip) => ip,
            IpAddr::V6(_) => return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Passive mode requires IPv4")),
        };
        let listener = match TcpListener::bind((ip, 0)).await {
            Ok(listener) => listener,
            Err(err) => {
                slog::warn!(args.logger, "Could not bind the passive-mode acceptor: {}", err);
                return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Failed to enter passive mode"));
            }
        };
        let port = listener.local_addr()?.port();

        let mut session = args.session.lock().await;
        // A session is in passive or active mode, never both.
        session.data_listener = Some(listener);
        session.active_endpoint = None;

        let octets = ip.octets();
        let p1 = port >> 8;
        let p2 = port & 0xff;
        Ok(Reply::new_with_string(
            ReplyCode::EnteringPassiveMode,
            format!("Entering Passive Mode ({},{},{},{},{},{}).", octets[0], octets[1], octets[2], octets[3], p1, p2),
        ))
    }
}
