//! The RFC 959 Change To Parent Directory (`CDUP`) command
//
// CWD with a fixed argument of "..". The parent of the virtual root is the
// root itself, so CDUP at `/` succeeds and stays put.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Cdup;

#[async_trait]
impl CommandHandler for Cdup {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute("..");
        match storage.metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {
                session.cwd = path;
                Ok(Reply::new(ReplyCode::FileActionOkay, "Working directory changed"))
            }
            _ => Ok(Reply::new(ReplyCode::FileError, "Failed to change directory")),
        }
    }
}
