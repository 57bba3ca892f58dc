//! The RFC 959 Rename To (`RNTO`) command
//
// Second half of the two-step rename. Without a pending RNFR source this is
// a sequencing error.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Rnto {
    path: String,
}

impl Rnto {
    pub fn new(path: String) -> Self {
        Rnto { path }
    }
}

#[async_trait]
impl CommandHandler for Rnto {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let from = match session.rename_from.take() {
            Some(from) => from,
            None => return Ok(Reply::new(ReplyCode::BadCommandSequence, "Bad sequence of commands")),
        };
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        // The permission check ran at RNFR time, against the source's type.
        let to = session.ftp_absolute(&self.path);
        match storage.rename(&from, &to).await {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Rename successful")),
            Err(err) => Ok(storage_error_reply(err)),
        }
    }
}
