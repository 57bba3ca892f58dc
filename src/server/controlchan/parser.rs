//! Turns one CRLF-terminated line from the control socket into a
//! [`ParsedCommand`].

use super::command::{Command, ParsedCommand};
use super::error::ControlChanError;
use std::net::Ipv4Addr;

/// Parses a single line (including its line terminator) into a command.
/// Returns `Ok(None)` for empty lines, which are ignored per RFC 959.
pub fn parse_line(line: &[u8]) -> Result<Option<ParsedCommand>, ControlChanError> {
    let mut end = line.len();
    while end > 0 && (line[end - 1] == b'\r' || line[end - 1] == b'\n') {
        end -= 1;
    }
    let line = std::str::from_utf8(&line[..end]).map_err(|_| ControlChanError::Utf8)?;
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, argument) = match line.find(' ') {
        Some(idx) => (&line[..idx], line[idx..].trim_start_matches(' ')),
        None => (line, ""),
    };
    let verb = verb.to_ascii_uppercase();
    let argument = argument.to_string();

    let command = build_command(&verb, &argument)?;
    Ok(Some(ParsedCommand { verb, argument, command }))
}

fn build_command(verb: &str, argument: &str) -> Result<Command, ControlChanError> {
    let command = match verb {
        "USER" => Command::User {
            username: required(verb, argument)?,
        },
        "PASS" => Command::Pass {
            password: argument.to_string(),
        },
        "ACCT" => Command::Acct,
        "QUIT" => Command::Quit,
        "REIN" => Command::Rein,
        "CWD" | "XCWD" => Command::Cwd {
            path: required(verb, argument)?,
        },
        "CDUP" => Command::Cdup,
        "PWD" | "XPWD" => no_argument(verb, argument, Command::Pwd)?,
        "TYPE" => Command::Type {
            param: required(verb, argument)?.to_ascii_uppercase(),
        },
        "STRU" => Command::Stru {
            param: required(verb, argument)?.to_ascii_uppercase(),
        },
        "MODE" => Command::Mode {
            param: required(verb, argument)?.to_ascii_uppercase(),
        },
        "PORT" => parse_port(verb, argument)?,
        "PASV" => no_argument(verb, argument, Command::Pasv)?,
        "RETR" => Command::Retr {
            path: required(verb, argument)?,
        },
        "STOR" => Command::Stor {
            path: required(verb, argument)?,
        },
        "STOU" => Command::Stou {
            path: if argument.is_empty() { None } else { Some(argument.to_string()) },
        },
        "APPE" => Command::Appe {
            path: required(verb, argument)?,
        },
        "REST" => Command::Rest {
            offset: argument.parse::<u64>().map_err(|_| invalid(verb))?,
        },
        "SIZE" => Command::Size {
            path: required(verb, argument)?,
        },
        "RNFR" => Command::Rnfr {
            path: required(verb, argument)?,
        },
        "RNTO" => Command::Rnto {
            path: required(verb, argument)?,
        },
        "ABOR" => Command::Abor,
        "DELE" => Command::Dele {
            path: required(verb, argument)?,
        },
        "RMD" | "XRMD" => Command::Rmd {
            path: required(verb, argument)?,
        },
        "MKD" | "XMKD" => Command::Mkd {
            path: required(verb, argument)?,
        },
        "LIST" => Command::List {
            path: listing_path(argument),
        },
        "NLST" => Command::Nlst {
            path: listing_path(argument),
        },
        "SITE" => Command::Site,
        "SYST" => no_argument(verb, argument, Command::Syst)?,
        "STAT" => Command::Stat,
        "HELP" => Command::Help,
        "NOOP" => no_argument(verb, argument, Command::Noop)?,
        "ALLO" => Command::Allo,
        "FEAT" => no_argument(verb, argument, Command::Feat)?,
        "OPTS" => Command::Opts {
            param: required(verb, argument)?,
        },
        _ => Command::Other,
    };
    Ok(command)
}

fn invalid(verb: &str) -> ControlChanError {
    ControlChanError::InvalidArgument { verb: verb.to_string() }
}

fn required(verb: &str, argument: &str) -> Result<String, ControlChanError> {
    if argument.is_empty() {
        return Err(invalid(verb));
    }
    Ok(argument.to_string())
}

fn no_argument(verb: &str, argument: &str, command: Command) -> Result<Command, ControlChanError> {
    if !argument.is_empty() {
        return Err(invalid(verb));
    }
    Ok(command)
}

// LIST and NLST may carry ls-style options before the path; we ignore those.
fn listing_path(argument: &str) -> Option<String> {
    argument.split(' ').find(|token| !token.is_empty() && !token.starts_with('-')).map(|token| token.to_string())
}

// The PORT argument is h1,h2,h3,h4,p1,p2 with all six values decimal octets.
fn parse_port(verb: &str, argument: &str) -> Result<Command, ControlChanError> {
    let mut octets = [0u8; 6];
    let mut count = 0;
    for part in argument.split(',') {
        if count == 6 {
            return Err(invalid(verb));
        }
        octets[count] = part.trim().parse::<u8>().map_err(|_| invalid(verb))?;
        count += 1;
    }
    if count != 6 {
        return Err(invalid(verb));
    }
    Ok(Command::Port {
        host: Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]),
        port: u16::from(octets[4]) << 8 | u16::from(octets[5]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(line: &str) -> ParsedCommand {
        parse_line(line.as_bytes()).unwrap().unwrap()
    }

    #[test]
    fn verb_is_uppercased_and_argument_preserved() {
        let parsed = parse_ok("stor My File.txt\r\n");
        assert_eq!(parsed.verb, "STOR");
        assert_eq!(parsed.argument, "My File.txt");
        assert_eq!(
            parsed.command,
            Command::Stor {
                path: "My File.txt".to_string()
            }
        );
    }

    #[test]
    fn empty_lines_are_ignored() {
        assert!(parse_line(b"\r\n").unwrap().is_none());
        assert!(parse_line(b"\n").unwrap().is_none());
    }

    #[test]
    fn leading_space_run_is_stripped_inner_whitespace_kept() {
        let parsed = parse_ok("CWD   a  b\r\n");
        assert_eq!(parsed.argument, "a  b");
    }

    #[test]
    fn unknown_verbs_become_other() {
        let parsed = parse_ok("MLSD\r\n");
        assert_eq!(parsed.command, Command::Other);
        assert_eq!(parsed.verb, "MLSD");
    }

    #[test]
    fn non_utf8_is_rejected() {
        assert!(matches!(parse_line(b"USER \xff\xfe\r\n"), Err(ControlChanError::Utf8)));
    }

    #[test]
    fn port_parses_the_six_octets() {
        let parsed = parse_ok("PORT 127,0,0,1,4,1\r\n");
        assert_eq!(
            parsed.command,
            Command::Port {
                host: Ipv4Addr::new(127, 0, 0, 1),
                port: 1025,
            }
        );
    }

    #[test]
    fn malformed_port_is_an_argument_error() {
        for bad in ["PORT 127,0,0,1,4\r\n", "PORT 300,0,0,1,4,1\r\n", "PORT foo\r\n", "PORT 1,2,3,4,5,6,7\r\n"] {
            assert!(matches!(parse_line(bad.as_bytes()), Err(ControlChanError::InvalidArgument { .. })), "{}", bad);
        }
    }

    #[test]
    fn rest_requires_a_decimal_offset() {
        assert_eq!(parse_ok("REST 42\r\n").command, Command::Rest { offset: 42 });
        assert!(parse_line(b"REST x\r\n").is_err());
    }

    #[test]
    fn list_skips_option_tokens() {
        assert_eq!(parse_ok("LIST -la\r\n").command, Command::List { path: None });
        assert_eq!(
            parse_ok("LIST -l sub\r\n").command,
            Command::List {
                path: Some("sub".to_string())
            }
        );
        assert_eq!(parse_ok("NLST\r\n").command, Command::Nlst { path: None });
    }

    #[test]
    fn stou_path_is_optional() {
        assert_eq!(parse_ok("STOU\r\n").command, Command::Stou { path: None });
        assert_eq!(
            parse_ok("STOU draft.txt\r\n").command,
            Command::Stou {
                path: Some("draft.txt".to_string())
            }
        );
    }

    #[test]
    fn passwords_are_masked_in_debug_output() {
        let parsed = parse_ok("PASS hunter2\r\n");
        assert_eq!(format!("{:?}", parsed), "PASS ******");
    }
}
