use super::error::ControlChanError;
use super::event::Event;
use super::reply::Reply;
use async_trait::async_trait;

// The event handler chain around command processing. Every layer may answer
// an event itself or pass it further down; the innermost layer dispatches to
// the per-command handlers.
#[async_trait]
pub trait ControlChanMiddleware: Send + Sync {
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError>;
}
