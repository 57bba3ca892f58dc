//! The login gate of the command chain.
//
// Which commands a session may use depends on where it is in the handshake:
// before USER only the handshake itself and a few stateless commands are
// allowed; while a PASS is pending the set shrinks further; once logged in
// everything goes through. PASS before USER is a sequencing error rather
// than an authentication one.

use super::command::Command;
use super::error::ControlChanError;
use super::event::Event;
use super::middleware::ControlChanMiddleware;
use super::reply::{Reply, ReplyCode};
use crate::server::session::{SessionState, SharedSession};
use async_trait::async_trait;

pub struct AuthMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    pub session: SharedSession,
    pub next: Next,
}

#[async_trait]
impl<Next> ControlChanMiddleware for AuthMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError> {
        if let Event::Command(parsed) = &event {
            let state = { self.session.lock().await.state };
            if let Some(reply) = gate(state, &parsed.command) {
                return Ok(reply);
            }
        }
        self.next.handle(event).await
    }
}

fn gate(state: SessionState, command: &Command) -> Option<Reply> {
    match state {
        SessionState::WaitCmd => None,
        SessionState::New => match command {
            Command::User { .. } | Command::Quit | Command::Feat | Command::Opts { .. } | Command::Noop | Command::Help => None,
            Command::Pass { .. } => Some(Reply::new(ReplyCode::BadCommandSequence, "Please give me a USER first")),
            _ => Some(Reply::new(ReplyCode::NotLoggedIn, "Not logged in")),
        },
        SessionState::WaitPass => match command {
            Command::Pass { .. } | Command::Quit | Command::User { .. } | Command::Noop => None,
            _ => Some(Reply::new(ReplyCode::NotLoggedIn, "Not logged in")),
        },
    }
}
