use super::error::ControlChanError;
use super::event::Event;
use super::middleware::ControlChanMiddleware;
use super::reply::Reply;
use async_trait::async_trait;

// Logs every event entering the chain and the reply leaving it, correlated
// by a per-session sequence number.
pub struct LoggingMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    pub logger: slog::Logger,
    pub sequence_nr: u64,
    pub next: Next,
}

#[async_trait]
impl<Next> ControlChanMiddleware for LoggingMiddleware<Next>
where
    Next: ControlChanMiddleware,
{
    async fn handle(&mut self, event: Event) -> Result<Reply, ControlChanError> {
        self.sequence_nr += 1;
        slog::debug!(self.logger, "Incoming control channel event: {:?}", event; "seq" => self.sequence_nr);
        let result = self.next.handle(event).await;
        match &result {
            Ok(reply) => slog::debug!(self.logger, "Outgoing control channel reply: {:?}", reply; "seq" => self.sequence_nr),
            Err(error) => slog::warn!(self.logger, "Control channel error: {}", error; "seq" => self.sequence_nr),
        }
        result
    }
}
