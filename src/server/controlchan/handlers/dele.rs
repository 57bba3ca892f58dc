//! The RFC 959 Delete (`DELE`) command

use crate::auth::Permissions;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Dele {
    path: String,
}

impl Dele {
    pub fn new(path: String) -> Self {
        Dele { path }
    }
}

#[async_trait]
impl CommandHandler for Dele {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::FILE_DELETE) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        match storage.del(&path).await {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "File deleted")),
            Err(err) => Ok(storage_error_reply(err)),
        }
    }
}
