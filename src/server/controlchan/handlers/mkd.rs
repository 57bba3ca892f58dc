//! The RFC 959 Make Directory (`MKD`) command
//
// Replies 257 with the created path, quoted the same way PWD quotes the
// working directory.

use crate::auth::Permissions;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, quote_ftp_path, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Mkd {
    path: String,
}

impl Mkd {
    pub fn new(path: String) -> Self {
        Mkd { path }
    }
}

#[async_trait]
impl CommandHandler for Mkd {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::DIR_CREATE) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        match storage.mkd(&path).await {
            Ok(()) => Ok(Reply::new_with_string(
                ReplyCode::DirCreated,
                format!("{} directory created", quote_ftp_path(&path.to_string_lossy())),
            )),
            Err(err) => Ok(storage_error_reply(err)),
        }
    }
}
