//! The RFC 959 Append (`APPE`) command
//
// Like STOR, but appends to the target instead of truncating it, creating
// the file when it does not exist yet.

use crate::auth::Permissions;
use crate::server::chancomms::DataChanCmd;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan;
use async_trait::async_trait;

pub struct Appe {
    path: String,
}

impl Appe {
    pub fn new(path: String) -> Self {
        Appe { path }
    }
}

#[async_trait]
impl CommandHandler for Appe {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::FILE_APPEND) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        session.start_pos = 0;
        let file = match storage.append(&path).await {
            Ok(file) => file,
            Err(err) => return Ok(storage_error_reply(err)),
        };
        let cmd = DataChanCmd::Appe {
            file,
            path: self.path.clone(),
        };
        match datachan::spawn_transfer(&mut session, args.session.clone(), cmd, args.tx_control_chan.clone(), args.logger.clone()) {
            Ok(()) => Ok(Reply::new(ReplyCode::FileStatusOkay, "Ready to receive data")),
            Err(reply) => Ok(reply),
        }
    }
}
