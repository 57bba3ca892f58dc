//! The RFC 959 Store (`STOR`) command
//
// Uploads a file, truncating any existing content. The target is opened
// before the 150 so that permission and path problems leave the data
// connection untouched.

use crate::auth::Permissions;
use crate::server::chancomms::DataChanCmd;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan;
use async_trait::async_trait;

pub struct Stor {
    path: String,
}

impl Stor {
    pub fn new(path: String) -> Self {
        Stor { path }
    }
}

#[async_trait]
impl CommandHandler for Stor {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::FILE_WRITE) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        session.start_pos = 0;
        let file = match storage.create(&path).await {
            Ok(file) => file,
            Err(err) => return Ok(storage_error_reply(err)),
        };
        let cmd = DataChanCmd::Stor {
            file,
            path: self.path.clone(),
        };
        match datachan::spawn_transfer(&mut session, args.session.clone(), cmd, args.tx_control_chan.clone(), args.logger.clone()) {
            Ok(()) => Ok(Reply::new(ReplyCode::FileStatusOkay, "Ready to receive data")),
            Err(reply) => Ok(reply),
        }
    }
}
