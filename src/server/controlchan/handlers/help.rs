//! The RFC 959 Help (`HELP`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::HelpMessage, "Help is limited; RFC 959 has the details"))
    }
}
