//! The RFC 959 Representation Type (`TYPE`) command
//
// Only ASCII Non-print (A) and Image (I) are supported. ASCII mode is
// accepted but byte-transparent on the wire; real clients transfer binary.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Type {
    param: String,
}

impl Type {
    pub fn new(param: String) -> Self {
        Type { param }
    }
}

#[async_trait]
impl CommandHandler for Type {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        match self.param.as_str() {
            "A" | "A N" => {
                session.binary_mode = false;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to ASCII mode"))
            }
            "I" => {
                session.binary_mode = true;
                Ok(Reply::new(ReplyCode::CommandOkay, "Switching to binary mode"))
            }
            _ => Ok(Reply::new(ReplyCode::CommandNotImplementedForParameter, "Unsupported representation type")),
        }
    }
}
