//! The RFC 959 Status (`STAT`) command

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use async_trait::async_trait;

pub struct Stat;

#[async_trait]
impl CommandHandler for Stat {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let text = match &session.username {
            Some(username) => format!("Logged in as {}", username),
            None => "Not logged in".to_string(),
        };
        Ok(Reply::new_multiline(ReplyCode::SystemStatus, vec!["FTP server status:".to_string(), format!(" {}", text), "End of status".to_string()]))
    }
}
