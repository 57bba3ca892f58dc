//! The RFC 959 Password (`PASS`) command
//
// The argument is the password completing the user's identification. A
// failed check returns the session to the start of the handshake.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::{Reply, ReplyCode};
use crate::server::session::SessionState;
use async_trait::async_trait;

pub struct Pass {
    password: String,
}

impl Pass {
    pub fn new(password: String) -> Self {
        Pass { password }
    }
}

#[async_trait]
impl CommandHandler for Pass {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        match session.state {
            SessionState::WaitCmd => Ok(Reply::new(ReplyCode::UserLoggedIn, "Already logged in")),
            SessionState::WaitPass => {
                let username = session.username.clone().unwrap_or_default();
                match args.users.authenticate(&username, &self.password) {
                    Some(account) => {
                        slog::info!(args.logger, "User {} logged in", account.username);
                        session.login(account);
                        Ok(Reply::new(ReplyCode::UserLoggedIn, "Login successful"))
                    }
                    None => {
                        slog::info!(args.logger, "Failed login attempt for {}", username);
                        session.logout();
                        Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in"))
                    }
                }
            }
            // The auth gate answers PASS-before-USER, but be safe.
            SessionState::New => Ok(Reply::new(ReplyCode::BadCommandSequence, "Please give me a USER first")),
        }
    }
}
