//! The RFC 959 Store Unique (`STOU`) command
//
// Like STOR, but the server picks a name that does not exist in the working
// directory yet: the client's name as-is when free, otherwise with the
// smallest numeric suffix appended. The terminal reply carries the chosen
// name as `226 FILE: <name>`. Two sessions racing for the same name are left
// to the host filesystem, as with every other write.

use crate::auth::Permissions;
use crate::server::chancomms::DataChanCmd;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{check_permission, storage_error_reply, storage_of, CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::datachan;
use async_trait::async_trait;

const DEFAULT_BASENAME: &str = "ftpupload";

pub struct Stou {
    path: Option<String>,
}

impl Stou {
    pub fn new(path: Option<String>) -> Self {
        Stou { path }
    }
}

#[async_trait]
impl CommandHandler for Stou {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        if let Err(reply) = check_permission(&session, Permissions::FILE_WRITE) {
            return Ok(reply);
        }
        let storage = match storage_of(&session) {
            Ok(storage) => storage,
            Err(reply) => return Ok(reply),
        };

        // The unique name lives in the working directory, whatever directory
        // components the client may have sent along.
        let base = self
            .path
            .as_deref()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_BASENAME)
            .to_string();
        let mut filename = base.clone();
        let mut seq: u32 = 0;
        while storage.metadata(&session.ftp_absolute(&filename)).await.is_ok() {
            seq += 1;
            filename = format!("{}.{}", base, seq);
        }

        let path = session.ftp_absolute(&filename);
        session.start_pos = 0;
        let file = match storage.create(&path).await {
            Ok(file) => file,
            Err(err) => return Ok(storage_error_reply(err)),
        };
        let cmd = DataChanCmd::Stou { file, filename };
        match datachan::spawn_transfer(&mut session, args.session.clone(), cmd, args.tx_control_chan.clone(), args.logger.clone()) {
            Ok(()) => Ok(Reply::new(ReplyCode::FileStatusOkay, "Ready to receive data")),
            Err(reply) => Ok(reply),
        }
    }
}
