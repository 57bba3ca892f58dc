//! The RFC 959 Abort (`ABOR`) command
//
// Tears down the data channel: an in-flight transfer is cancelled (whatever
// was uploaded so far stays on disk) and a prepared PASV/PORT setup is
// dropped. RFC 959 would have the interrupted transfer answered separately;
// here ABOR produces the single collapsed reply below, and the cancelled
// transfer reports nothing.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Abor;

#[async_trait]
impl CommandHandler for Abor {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        session.reset_data_channel();
        Ok(Reply::new(ReplyCode::ClosingDataConnection, "Closing data connection; Data transfer aborted."))
    }
}
