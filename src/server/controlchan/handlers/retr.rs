//! The RFC 959 Retrieve (`RETR`) command
//
// Downloads a file. The file is opened (and positioned at the REST offset)
// before the preliminary 150 goes out, so open failures never touch the data
// connection. The terminal reply arrives from the data task once the socket
// has been closed.

use crate::auth::Permissions;
use crate::server::chancomms::DataChanCmd;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan;
use async_trait::async_trait;

pub struct Retr {
    path: String,
}

impl Retr {
    pub fn new(path: String) -> Self {
        Retr { path }
    }
}

#[async_trait]
impl CommandHandler for Retr {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::FILE_READ) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = session.ftp_absolute(&self.path);
        let start_pos = session.start_pos;
        session.start_pos = 0;
        let file = match storage.open_read(&path, start_pos).await {
            Ok(file) => file,
            Err(err) => return Ok(storage_error_reply(err)),
        };
        let cmd = DataChanCmd::Retr {
            file,
            path: self.path.clone(),
        };
        match datachan::spawn_transfer(&mut session, args.session.clone(), cmd, args.tx_control_chan.clone(), args.logger.clone()) {
            Ok(()) => Ok(Reply::new(ReplyCode::FileStatusOkay, "Sending file")),
            Err(reply) => Ok(reply),
        }
    }
}
