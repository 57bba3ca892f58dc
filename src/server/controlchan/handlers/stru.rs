//! The RFC 959 File Structure (`STRU`) command
//
// Only the default File structure makes sense on a byte-stream filesystem.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Stru {
    param: String,
}

impl Stru {
    pub fn new(param: String) -> Self {
        Stru { param }
    }
}

#[async_trait]
impl CommandHandler for Stru {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        match self.param.as_str() {
            "F" => Ok(Reply::new(ReplyCode::CommandOkay, "Structure set to File")),
            _ => Ok(Reply::new(ReplyCode::CommandNotImplementedForParameter, "Only File structure is supported")),
        }
    }
}
