//! The RFC 959 User Name (`USER`) command
//
// The argument is the name that identifies the user. It is normally the
// first command a client sends after the control connection is made. Sending
// it again restarts the login handshake, dropping any previous login.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::SessionState;
use async_trait::async_trait;

pub struct User {
    username: String,
}

impl User {
    pub fn new(username: String) -> Self {
        User { username }
    }
}

#[async_trait]
impl CommandHandler for User {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        session.logout();

        // The reserved anonymous account needs no password check; the user is
        // logged in right away. We still answer 331 so that clients following
        // the usual USER/PASS script stay on track; their PASS gets a 230.
        if self.username == "anonymous" || self.username == "ftp" {
            if let Some(account) = args.users.lookup(&self.username).cloned() {
                session.login(account);
                return Ok(Reply::new(ReplyCode::NeedPassword, "Anonymous login ok, send any password"));
            }
        }

        session.username = Some(self.username.clone());
        session.state = SessionState::WaitPass;
        Ok(Reply::new_with_string(ReplyCode::NeedPassword, format!("Password required for {}", self.username)))
    }
}
