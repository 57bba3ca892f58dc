use super::command::ParsedCommand;
use crate::server::chancomms::ControlChanMsg;

// An event for the control loop: either a command from the peer or an
// internal message, typically the terminal result of a data transfer.
#[derive(Debug)]
pub enum Event {
    Command(ParsedCommand),
    InternalMsg(ControlChanMsg),
}
