//! The RFC 959 Data Port (`PORT`) command
//
// Stores the endpoint the client is listening on; the outbound connect
// happens when the transfer command arrives. One PORT is good for one
// transfer.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddrV4};

pub struct Port {
    host: Ipv4Addr,
    port: u16,
}

impl Port {
    pub fn new(host: Ipv4Addr, port: u16) -> Self {
        Port { host, port }
    }
}

#[async_trait]
impl CommandHandler for Port {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        // A session is in passive or active mode, never both.
        session.active_endpoint = Some(SocketAddrV4::new(self.host, self.port));
        session.data_listener = None;
        Ok(Reply::new(ReplyCode::CommandOkay, "PORT command successful"))
    }
}
