//! The RFC 959 Site Parameters (`SITE`) command
//
// No site-specific subcommands are offered.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Site;

#[async_trait]
impl CommandHandler for Site {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        Ok(Reply::new(ReplyCode::CommandOkay, "Nothing to do here"))
    }
}
