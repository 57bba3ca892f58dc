//! The RFC 959 Logout (`QUIT`) command.
//
// This command terminates the session. The goodbye reply is flushed first;
// the control loop picks the exit message up right after and closes the
// socket, so nothing else is ever sent.

use crate::server::chancomms::ControlChanMsg;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        if let Err(err) = args.tx_control_chan.send(ControlChanMsg::ExitControlLoop).await {
            slog::warn!(args.logger, "Could not send the exit message: {}", err);
        }
        Ok(Reply::new(ReplyCode::ClosingControlConnection, "Goodbye"))
    }
}
