//! The RFC 959 Reinitialize (`REIN`) command
//
// Flushes all session state: the user is logged out, transfer parameters and
// the rename/REST bookkeeping are cleared, and any prepared or in-flight
// data channel is dropped. The control connection stays open, back at the
// start of the login handshake.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Rein;

#[async_trait]
impl CommandHandler for Rein {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        session.logout();
        Ok(Reply::new(ReplyCode::ServiceReady, "Service ready for new user"))
    }
}
