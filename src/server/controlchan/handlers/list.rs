//! The RFC 959 List (`LIST`) command
//
// Streams a UNIX long listing of the directory over the data channel, one
// CRLF-terminated line per entry, ordered byte-wise by name. The snapshot is
// taken before the 150 so that a bad path is answered without opening the
// data connection.

use crate::auth::Permissions;
use crate::server::chancomms::DataChanCmd;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan;
use async_trait::async_trait;

pub struct List {
    path: Option<String>,
}

impl List {
    pub fn new(path: Option<String>) -> Self {
        List { path }
    }
}

#[async_trait]
impl CommandHandler for List {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::DIR_LIST) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };
        let path = match &self.path {
            Some(path) => session.ftp_absolute(path),
            None => session.cwd.clone(),
        };
        let entries = match storage.list(&path).await {
            Ok(entries) => entries,
            Err(err) => return Ok(storage_error_reply(err)),
        };
        let mut data = Vec::new();
        for entry in entries {
            data.extend_from_slice(format!("{}\r\n", entry).as_bytes());
        }
        match datachan::spawn_transfer(&mut session, args.session.clone(), DataChanCmd::List { data }, args.tx_control_chan.clone(), args.logger.clone()) {
            Ok(()) => Ok(Reply::new(ReplyCode::FileStatusOkay, "Sending directory listing")),
            Err(reply) => Ok(reply),
        }
    }
}
