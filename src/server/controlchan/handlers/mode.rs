//! The RFC 959 Transfer Mode (`MODE`) command
//
// Only Stream mode is supported; Block and Compressed never made it past
// the seventies.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Mode {
    param: String,
}

impl Mode {
    pub fn new(param: String) -> Self {
        Mode { param }
    }
}

#[async_trait]
impl CommandHandler for Mode {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        match self.param.as_str() {
            "S" => Ok(Reply::new(ReplyCode::CommandOkay, "Mode set to Stream")),
            _ => Ok(Reply::new(ReplyCode::CommandNotImplementedForParameter, "Only Stream mode is supported")),
        }
    }
}
