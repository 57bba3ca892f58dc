//! The `SIZE` command (RFC 3659)
//
// Reports the transfer size of a file. Only meaningful in binary type: in
// ASCII type the on-wire size may differ from the on-disk size, so the
// command is refused there.

use crate::auth::Permissions;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Size {
    path: String,
}

impl Size {
    pub fn new(path: String) -> Self {
        Size { path }
    }
}

#[async_trait]
impl CommandHandler for Size {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        if !session.binary_mode {
            return Ok(Reply::new(ReplyCode::FileError, "SIZE not allowed in ASCII mode"));
        }
        if let Err(reply) = check_permission(&session, Permissions::FILE_READ) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        match storage.metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(Reply::new_with_string(ReplyCode::FileStatus, format!("{}", metadata.len()))),
            _ => Ok(Reply::new(ReplyCode::FileError, "Could not get file size")),
        }
    }
}
