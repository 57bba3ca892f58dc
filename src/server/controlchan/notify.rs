//! The embedder's command observer.
//
// The callback fires after every command has produced its reply. A terminal
// data-transfer reply (the 226 after a 150) arrives as an internal message,
// so the verb and argument of the last command are kept around and reported
// with it.

use super::error::ControlChanError;
use super::event::Event;
use super::middleware::ControlChanMiddleware;
use super::reply::Reply;
use crate::server::ftpserver::FtpCommandCallback;
use async_trait::async_trait;

pub struct CommandObserverMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    pub callback: Option<FtpCommandCallback>,
    pub last_command: String,
    pub last_argument: String,
    pub next: Next,
}

#[async_trait]
impl<Next> ControlChanMiddleware for CommandObserverMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError> {
        if let Event::Command(parsed) = &event {
            self.last_command = parsed.verb.clone();
            self.last_argument = parsed.argument.clone();
        }
        let reply = self.next.handle(event).await?;
        if let Some(callback) = &self.callback {
            if let Some((code, text)) = reply.code_and_text() {
                callback(&self.last_command, &self.last_argument, code, text);
            }
        }
        Ok(reply)
    }
}
