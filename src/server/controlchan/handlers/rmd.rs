//! The RFC 959 Remove Directory (`RMD`) command
//
// Only empty directories can be removed; the error for a non-empty one comes
// straight from the host filesystem.

use crate::auth::Permissions;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Rmd {
    path: String,
}

impl Rmd {
    pub fn new(path: String) -> Self {
        Rmd { path }
    }
}

#[async_trait]
impl CommandHandler for Rmd {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::DIR_DELETE) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        match storage.rmd(&path).await {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Directory removed")),
            Err(err) => Ok(storage_error_reply(err)),
        }
    }
}
