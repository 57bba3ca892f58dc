//! The RFC 2389 Options (`OPTS`) command
//
// The only option with defined behavior here is UTF8; paths are always
// treated as UTF-8 anyway, so turning it on is a no-op and anything else is
// a parameter error.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Opts {
    param: String,
}

impl Opts {
    pub fn new(param: String) -> Self {
        Opts { param }
    }
}

#[async_trait]
impl CommandHandler for Opts {
    async fn handle(&self, _args: CommandContext) -> Result<Reply, ControlChanError> {
        let tokens: Vec<String> = self.param.split_whitespace().map(|t| t.to_ascii_uppercase()).collect();
        match tokens.iter().map(|t| t.as_str()).collect::<Vec<_>>().as_slice() {
            ["UTF8", "ON"] => Ok(Reply::new(ReplyCode::CommandOkay, "Always in UTF-8 mode")),
            _ => Ok(Reply::new(ReplyCode::ParameterSyntaxError, "Option not understood")),
        }
    }
}
