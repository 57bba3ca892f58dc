//! The RFC 959 Allocate (`ALLO`) command
//
// Storage allocation is a mainframe-era concern; nothing to do here.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Allo;

#[async_trait]
impl CommandHandler for Allo {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::CommandOkayNotImplemented, "No storage allocation necessary"))
    }
}
