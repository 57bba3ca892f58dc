//! The RFC 959 Rename From (`RNFR`) command
//
// First half of the two-step rename. The required permission bit depends on
// whether the source is a file or a directory, so the check happens here
// where the metadata is known. The stored source survives only until the
// next command; anything but RNTO clears it.

use crate::auth::Permissions;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Rnfr {
    path: String,
}

impl Rnfr {
    pub fn new(path: String) -> Self {
        Rnfr { path }
    }
}

#[async_trait]
impl CommandHandler for Rnfr {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        match storage.metadata(&path).await {
            Ok(metadata) => {
                let required = if metadata.is_dir() { Permissions::DIR_RENAME } else { Permissions::FILE_RENAME };
                if let Err(reply) = check_permission(&session, required) {
                    return Ok(reply);
                }
                session.rename_from = Some(path);
                Ok(Reply::new(ReplyCode::FileActionPending, "Ready for RNTO"))
            }
            Err(err) => Ok(storage_error_reply(err)),
        }
    }
}
