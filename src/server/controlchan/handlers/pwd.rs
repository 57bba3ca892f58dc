//! The RFC 959 Print Working Directory (`PWD`) command
//
// Replies 257 with the FTP-virtual working directory. The path is quoted,
// with embedded quotes doubled, per the RFC's reply format for 257.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{quote_ftp_path, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let cwd = session.cwd.to_string_lossy();
        Ok(Reply::new_with_string(ReplyCode::DirCreated, quote_ftp_path(&cwd)))
    }
}
