//! The RFC 959 Account (`ACCT`) command
//
// Accounts are not a thing here; USER/PASS fully identify the user.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Acct;

#[async_trait]
impl CommandHandler for Acct {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::CommandOkayNotImplemented, "Account not required"))
    }
}
