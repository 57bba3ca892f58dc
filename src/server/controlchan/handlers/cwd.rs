//! The RFC 959 Change Working Directory (`CWD`) command
//
// The argument names a directory, absolute or relative to the current one.
// The working directory only changes when the target exists and is a
// directory.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Cwd {
    path: String,
}

impl Cwd {
    pub fn new(path: String) -> Self {
        Cwd { path }
    }
}

#[async_trait]
impl CommandHandler for Cwd {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        match storage.metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {
                session.cwd = path;
                Ok(Reply::new(ReplyCode::FileActionOkay, "Working directory changed"))
            }
            Ok(_) => Ok(Reply::new(ReplyCode::FileError, "Not a directory")),
            Err(_) => Ok(Reply::new(ReplyCode::FileError, "Failed to change directory")),
        }
    }
}
