//! The RFC 2389 Feature (`FEAT`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Feat;

#[async_trait]
impl CommandHandler for Feat {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        // Each feature line must be indented by a space.
        let mut feat_text = vec![" REST STREAM", " SIZE", " UTF8"];

        // Show them in alphabetical order.
        feat_text.sort_unstable();
        feat_text.insert(0, "Extensions supported:");
        feat_text.push("END");

        Ok(Reply::new_multiline(ReplyCode::SystemStatus, feat_text))
    }
}
