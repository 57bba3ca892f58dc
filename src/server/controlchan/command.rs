use std::fmt;
use std::net::Ipv4Addr;

/// A parsed FTP command with its typed parameters.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    User { username: String },
    Pass { password: String },
    Acct,
    Quit,
    Rein,
    Cwd { path: String },
    Cdup,
    Pwd,
    Type { param: String },
    Stru { param: String },
    Mode { param: String },
    Port { host: Ipv4Addr, port: u16 },
    Pasv,
    Retr { path: String },
    Stor { path: String },
    Stou { path: Option<String> },
    Appe { path: String },
    Rest { offset: u64 },
    Size { path: String },
    Rnfr { path: String },
    Rnto { path: String },
    Abor,
    Dele { path: String },
    Rmd { path: String },
    Mkd { path: String },
    List { path: Option<String> },
    Nlst { path: Option<String> },
    Site,
    Syst,
    Stat,
    Help,
    Noop,
    Allo,
    Feat,
    Opts { param: String },
    // A verb we don't know. Gets a 500 but never kills the session.
    Other,
}

/// A command line as read from the control socket: the uppercased verb, the
/// raw argument (trailing CR/LF stripped, inner whitespace preserved) and the
/// typed command built from them.
#[derive(Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub verb: String,
    pub argument: String,
    pub command: Command,
}

impl fmt::Debug for ParsedCommand {
    // PASS arguments are secrets and must not end up in logs.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let argument: &str = if self.verb == "PASS" && !self.argument.is_empty() {
            "******"
        } else {
            &self.argument
        };
        write!(f, "{} {}", self.verb, argument)
    }
}
