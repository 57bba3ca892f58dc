//! The RFC 959 System (`SYST`) command
//
// Everyone answers UNIX Type: L8 regardless of the host; clients key their
// LIST parsing off it.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Syst;

#[async_trait]
impl CommandHandler for Syst {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::SystemType, "UNIX Type: L8"))
    }
}
