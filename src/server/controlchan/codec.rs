use super::command::ParsedCommand;
use super::error::ControlChanError;
use super::parser::parse_line;
use super::reply::Reply;

use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

// FtpCodec implements tokio's `Decoder` and `Encoder` traits for the control
// channel: incoming bytes are split on newlines and parsed into commands,
// outgoing replies are rendered into a single buffer so the peer never sees a
// reply split across writes.
pub struct FtpCodec {
    // Index of the next byte to examine for a '\n'. Avoids rescanning the
    // front of the buffer when a command arrives in several TCP segments.
    next_index: usize,
}

impl FtpCodec {
    pub fn new() -> Self {
        FtpCodec { next_index: 0 }
    }
}

impl Decoder for FtpCodec {
    type Item = ParsedCommand;
    type Error = ControlChanError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<ParsedCommand>, Self::Error> {
        // Empty lines are skipped rather than reported, hence the loop.
        loop {
            match buf[self.next_index..].iter().position(|b| *b == b'\n') {
                Some(newline_offset) => {
                    let newline_index = newline_offset + self.next_index;
                    let line = buf.split_to(newline_index + 1);
                    self.next_index = 0;
                    if let Some(command) = parse_line(&line)? {
                        return Ok(Some(command));
                    }
                }
                None => {
                    self.next_index = buf.len();
                    return Ok(None);
                }
            }
        }
    }
}

impl Encoder<Reply> for FtpCodec {
    type Error = ControlChanError;

    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        let mut buffer = vec![];
        match reply {
            Reply::None => {
                return Ok(());
            }
            Reply::CodeAndMsg { code, msg } => {
                if msg.is_empty() {
                    writeln!(buffer, "{}\r", code as u32)?;
                } else {
                    writeln!(buffer, "{} {}\r", code as u32, msg)?;
                }
            }
            Reply::MultiLine { code, mut lines } => {
                // The last line carries the code again, per RFC 959 4.2.
                let last_line = lines.pop().unwrap_or_default();

                // Continuation lines starting with a digit could be mistaken
                // for a reply code and must be indented.
                for it in lines.iter_mut() {
                    if it.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                        it.insert(0, ' ');
                    }
                }
                if lines.is_empty() {
                    writeln!(buffer, "{} {}\r", code as u32, last_line)?;
                } else {
                    write!(buffer, "{}-{}\r\n{} {}\r\n", code as u32, lines.join("\r\n"), code as u32, last_line)?;
                }
            }
        }
        buf.extend(&buffer);
        Ok(())
    }
}
