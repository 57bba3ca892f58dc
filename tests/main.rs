//! End-to-end tests: every test boots a real server on an OS-chosen port and
//! drives it over plain TCP, the same way an FTP client would.

use ftplet::{auth::Permissions, Server};
use pretty_assertions::assert_eq;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(10);

struct TestClient {
    reader: BufReader<TcpStream>,
    stream: TcpStream,
}

impl TestClient {
    // Connects to the control port and consumes the 220 greeting.
    fn connect(port: u16) -> TestClient {
        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        stream.set_read_timeout(Some(READ_TIMEOUT)).unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        let mut client = TestClient { reader, stream };
        let greeting = client.read_reply();
        assert!(greeting.starts_with("220 "), "unexpected greeting: {}", greeting);
        client
    }

    fn send(&mut self, line: &str) {
        self.stream.write_all(format!("{}\r\n", line).as_bytes()).unwrap();
    }

    // Reads one complete (possibly multi-line) reply.
    fn read_reply(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        if line.len() >= 4 && line.as_bytes()[3] == b'-' {
            let terminator = format!("{} ", &line[..3]);
            let mut full = line.clone();
            loop {
                let mut next = String::new();
                self.reader.read_line(&mut next).unwrap();
                full.push_str(&next);
                if next.starts_with(&terminator) {
                    break;
                }
            }
            return full;
        }
        line
    }

    fn cmd(&mut self, line: &str) -> String {
        self.send(line);
        self.read_reply()
    }

    fn login(&mut self, username: &str, password: &str) {
        let reply = self.cmd(&format!("USER {}", username));
        assert!(reply.starts_with("331 "), "USER reply: {}", reply);
        let reply = self.cmd(&format!("PASS {}", password));
        assert!(reply.starts_with("230 "), "PASS reply: {}", reply);
    }

    // Issues PASV and returns a socket connected to the advertised port.
    fn pasv_data_socket(&mut self) -> TcpStream {
        let reply = self.cmd("PASV");
        assert!(reply.starts_with("227 "), "PASV reply: {}", reply);
        let open = reply.find('(').unwrap();
        let close = reply.find(')').unwrap();
        let parts: Vec<u16> = reply[open + 1..close].split(',').map(|p| p.trim().parse().unwrap()).collect();
        let port = parts[4] * 256 + parts[5];
        let socket = TcpStream::connect(("127.0.0.1", port)).unwrap();
        socket.set_read_timeout(Some(READ_TIMEOUT)).unwrap();
        socket
    }
}

fn read_all(mut socket: TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    socket.read_to_end(&mut data).unwrap();
    data
}

// A real terminal logger so failing tests show what the server was doing.
fn test_logger() -> slog::Logger {
    use slog::Drain;
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    slog::Logger::root(drain, slog::o!())
}

// Boots a server with one fully privileged account ("test"/"test") rooted in
// a fresh temp dir.
fn start_server() -> (Server, u16, tempfile::TempDir) {
    start_server_with("test", "test", Permissions::ALL)
}

fn start_server_with(username: &str, password: &str, permissions: Permissions) -> (Server, u16, tempfile::TempDir) {
    let root = tempfile::tempdir().unwrap();
    let mut server = Server::bind("127.0.0.1", 0).unwrap().logger(test_logger());
    assert!(server.add_user(username, password, root.path(), permissions));
    server.start(2).unwrap();
    let port = server.port();
    (server, port, root)
}

#[test]
fn anonymous_login_pwd_quit() {
    let root = tempfile::tempdir().unwrap();
    let mut server = Server::bind("127.0.0.1", 0).unwrap();
    assert!(server.add_anonymous(root.path(), Permissions::READ_ONLY));
    server.start(1).unwrap();

    let mut client = TestClient::connect(server.port());
    let reply = client.cmd("USER anonymous");
    assert!(reply.starts_with("331 "), "USER reply: {}", reply);
    let reply = client.cmd("PASS x@y");
    assert!(reply.starts_with("230 "), "PASS reply: {}", reply);
    let reply = client.cmd("PWD");
    assert!(reply.starts_with("257 \"/\""), "PWD reply: {}", reply);
    let reply = client.cmd("QUIT");
    assert!(reply.starts_with("221 "), "QUIT reply: {}", reply);

    // After the 221 the server closes the socket without further replies.
    let mut rest = String::new();
    client.reader.read_line(&mut rest).unwrap();
    assert_eq!(rest, "");

    server.stop();
}

#[test]
fn the_ftp_alias_logs_into_the_anonymous_account() {
    let root = tempfile::tempdir().unwrap();
    let mut server = Server::bind("127.0.0.1", 0).unwrap();
    assert!(server.add_anonymous(root.path(), Permissions::READ_ONLY));
    server.start(1).unwrap();

    let mut client = TestClient::connect(server.port());
    client.login("ftp", "whatever");
    server.stop();
}

#[test]
fn pre_login_command_gating() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);

    // PASS before USER is a sequencing error, not an auth failure.
    let reply = client.cmd("PASS secret");
    assert!(reply.starts_with("503 "), "PASS-first reply: {}", reply);

    // Filesystem commands need a login.
    let reply = client.cmd("PWD");
    assert!(reply.starts_with("530 "), "PWD reply: {}", reply);
    let reply = client.cmd("SYST");
    assert!(reply.starts_with("530 "), "SYST reply: {}", reply);

    // FEAT and NOOP are open before USER...
    let reply = client.cmd("FEAT");
    assert!(reply.starts_with("211"), "FEAT reply: {}", reply);
    let reply = client.cmd("NOOP");
    assert!(reply.starts_with("200 "), "NOOP reply: {}", reply);

    // ...but while a PASS is pending the set shrinks.
    let reply = client.cmd("USER test");
    assert!(reply.starts_with("331 "), "USER reply: {}", reply);
    let reply = client.cmd("FEAT");
    assert!(reply.starts_with("530 "), "FEAT-in-WaitPass reply: {}", reply);

    server.stop();
}

#[test]
fn wrong_password_returns_to_start() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);

    let reply = client.cmd("USER test");
    assert!(reply.starts_with("331 "), "{}", reply);
    let reply = client.cmd("PASS wrong");
    assert!(reply.starts_with("530 "), "{}", reply);

    // The handshake restarts cleanly.
    client.login("test", "test");
    server.stop();
}

#[test]
fn rest_retr_resumes_at_the_offset() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("f"), b"ABCDEFGHIJ").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let reply = client.cmd("TYPE I");
    assert!(reply.starts_with("200 "), "{}", reply);

    let data = client.pasv_data_socket();
    let reply = client.cmd("REST 3");
    assert!(reply.starts_with("350 "), "{}", reply);
    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("150 "), "{}", reply);
    assert_eq!(read_all(data), b"DEFGHIJ");
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);

    // The offset applied to that one transfer only.
    let data = client.pasv_data_socket();
    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("150 "), "{}", reply);
    assert_eq!(read_all(data), b"ABCDEFGHIJ");
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);

    server.stop();
}

#[test]
fn stor_writes_exactly_the_uploaded_bytes() {
    let (mut server, port, root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let mut data = client.pasv_data_socket();
    let reply = client.cmd("STOR up.bin");
    assert!(reply.starts_with("150 "), "{}", reply);
    data.write_all(&payload).unwrap();
    drop(data);
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);
    assert_eq!(std::fs::read(root.path().join("up.bin")).unwrap(), payload);

    // APPE extends by exactly the appended bytes.
    let mut data = client.pasv_data_socket();
    let reply = client.cmd("APPE up.bin");
    assert!(reply.starts_with("150 "), "{}", reply);
    data.write_all(b"tail").unwrap();
    drop(data);
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);

    let mut expected = payload;
    expected.extend_from_slice(b"tail");
    assert_eq!(std::fs::read(root.path().join("up.bin")).unwrap(), expected);

    server.stop();
}

#[test]
fn stor_truncates_previous_content() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("f"), b"old old old").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let mut data = client.pasv_data_socket();
    let reply = client.cmd("STOR f");
    assert!(reply.starts_with("150 "), "{}", reply);
    data.write_all(b"new").unwrap();
    drop(data);
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);
    assert_eq!(std::fs::read(root.path().join("f")).unwrap(), b"new");

    server.stop();
}

#[test]
fn stou_picks_a_unique_name() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("x"), b"taken").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let mut data = client.pasv_data_socket();
    let reply = client.cmd("STOU x");
    assert!(reply.starts_with("150 "), "{}", reply);
    data.write_all(b"abc").unwrap();
    drop(data);
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);
    assert!(reply.contains("FILE: x.1"), "STOU terminal reply: {}", reply);
    assert_eq!(std::fs::read(root.path().join("x.1")).unwrap(), b"abc");
    assert_eq!(std::fs::read(root.path().join("x")).unwrap(), b"taken");

    server.stop();
}

#[test]
fn rnfr_is_invalidated_by_an_intervening_command() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("a"), b"content").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let reply = client.cmd("RNFR a");
    assert!(reply.starts_with("350 "), "{}", reply);
    let reply = client.cmd("NOOP");
    assert!(reply.starts_with("200 "), "{}", reply);
    let reply = client.cmd("RNTO b");
    assert!(reply.starts_with("503 Bad sequence of commands"), "{}", reply);

    // The uninterrupted sequence works.
    let reply = client.cmd("RNFR a");
    assert!(reply.starts_with("350 "), "{}", reply);
    let reply = client.cmd("RNTO b");
    assert!(reply.starts_with("250 "), "{}", reply);
    assert!(root.path().join("b").exists());
    assert!(!root.path().join("a").exists());

    server.stop();
}

#[test]
fn rnto_without_rnfr_is_a_sequence_error() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let reply = client.cmd("RNTO b");
    assert!(reply.starts_with("503 "), "{}", reply);
    server.stop();
}

#[test]
fn read_only_users_cannot_store() {
    let (mut server, port, root) = start_server_with("reader", "pw", Permissions::READ_ONLY);
    let mut client = TestClient::connect(port);
    client.login("reader", "pw");

    let _data = client.pasv_data_socket();
    let reply = client.cmd("STOR x");
    assert!(reply.starts_with("550 Permission denied"), "{}", reply);
    assert!(!root.path().join("x").exists());

    // Reading is still fine.
    std::fs::write(root.path().join("f"), b"ok").unwrap();
    let data = client.pasv_data_socket();
    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("150 "), "{}", reply);
    assert_eq!(read_all(data), b"ok");
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);

    server.stop();
}

#[test]
fn rename_permission_depends_on_source_type() {
    let (mut server, port, root) = start_server_with("half", "pw", Permissions::READ_ONLY | Permissions::FILE_RENAME);
    std::fs::write(root.path().join("f"), b"x").unwrap();
    std::fs::create_dir(root.path().join("d")).unwrap();

    let mut client = TestClient::connect(port);
    client.login("half", "pw");

    let reply = client.cmd("RNFR f");
    assert!(reply.starts_with("350 "), "{}", reply);
    let reply = client.cmd("RNTO g");
    assert!(reply.starts_with("250 "), "{}", reply);

    // Directory renames need DIR_RENAME, which this account lacks.
    let reply = client.cmd("RNFR d");
    assert!(reply.starts_with("550 Permission denied"), "{}", reply);

    server.stop();
}

#[test]
fn path_escapes_are_contained() {
    let (mut server, port, root) = start_server();
    // A file outside the user's root that must stay invisible.
    std::fs::write(root.path().parent().unwrap().join("ftplet-secret.txt"), b"secret").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let _data = client.pasv_data_socket();
    let reply = client.cmd("RETR ../ftplet-secret.txt");
    assert!(reply.starts_with("550 "), "{}", reply);

    // CDUP at the root stays at the root.
    let reply = client.cmd("CDUP");
    assert!(reply.starts_with("250 "), "{}", reply);
    let reply = client.cmd("PWD");
    assert!(reply.starts_with("257 \"/\""), "{}", reply);

    server.stop();
}

#[test]
fn list_is_sorted_and_ls_shaped() {
    let (mut server, port, root) = start_server();
    for name in ["b", "A", "a"] {
        std::fs::write(root.path().join(name), b"x").unwrap();
    }

    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let data = client.pasv_data_socket();
    let reply = client.cmd("LIST");
    assert!(reply.starts_with("150 "), "{}", reply);
    let listing = String::from_utf8(read_all(data)).unwrap();
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);

    let names: Vec<&str> = listing.lines().map(|line| line.rsplit(' ').next().unwrap()).collect();
    assert_eq!(names, vec!["A", "a", "b"]);
    for line in listing.lines() {
        assert!(line.starts_with('-'), "expected a file line: {}", line);
        // type+mode, links, owner, group, size, month, day, time, name
        assert!(line.split_whitespace().count() >= 9, "unexpected line shape: {}", line);
    }

    server.stop();
}

#[test]
fn nlst_streams_bare_names() {
    let (mut server, port, root) = start_server();
    for name in ["beta", "alpha"] {
        std::fs::write(root.path().join(name), b"x").unwrap();
    }

    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let data = client.pasv_data_socket();
    let reply = client.cmd("NLST");
    assert!(reply.starts_with("150 "), "{}", reply);
    let listing = String::from_utf8(read_all(data)).unwrap();
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);
    assert_eq!(listing, "alpha\r\nbeta\r\n");

    server.stop();
}

#[test]
fn size_requires_binary_type() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("f"), b"ABCDEFGHIJ").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");

    // The session starts in ASCII type.
    let reply = client.cmd("SIZE f");
    assert!(reply.starts_with("550 "), "{}", reply);

    let reply = client.cmd("TYPE I");
    assert!(reply.starts_with("200 "), "{}", reply);
    let reply = client.cmd("SIZE f");
    assert_eq!(reply.trim_end(), "213 10");

    server.stop();
}

#[test]
fn feat_and_opts() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let reply = client.cmd("FEAT");
    assert!(reply.starts_with("211-"), "{}", reply);
    assert!(reply.contains(" SIZE"), "{}", reply);
    assert!(reply.contains(" UTF8"), "{}", reply);
    assert!(reply.contains("211 END"), "{}", reply);

    let reply = client.cmd("OPTS UTF8 ON");
    assert!(reply.starts_with("200 "), "{}", reply);
    let reply = client.cmd("OPTS MLST size");
    assert!(reply.starts_with("501 "), "{}", reply);

    server.stop();
}

#[test]
fn active_mode_transfer_via_port() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("f"), b"active mode data").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");

    // The client listens; the server connects to us.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let data_port = listener.local_addr().unwrap().port();
    let reply = client.cmd(&format!("PORT 127,0,0,1,{},{}", data_port >> 8, data_port & 0xff));
    assert!(reply.starts_with("200 "), "{}", reply);

    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("150 "), "{}", reply);
    let (socket, _) = listener.accept().unwrap();
    socket.set_read_timeout(Some(READ_TIMEOUT)).unwrap();
    assert_eq!(read_all(socket), b"active mode data");
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);

    server.stop();
}

#[test]
fn transfers_need_a_data_channel_first() {
    let (mut server, port, root) = start_server();
    std::fs::write(root.path().join("f"), b"x").unwrap();

    let mut client = TestClient::connect(port);
    client.login("test", "test");
    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("425 "), "{}", reply);

    // One PASV is good for exactly one transfer.
    let data = client.pasv_data_socket();
    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("150 "), "{}", reply);
    read_all(data);
    let reply = client.read_reply();
    assert!(reply.starts_with("226 "), "{}", reply);
    let reply = client.cmd("RETR f");
    assert!(reply.starts_with("425 "), "{}", reply);

    server.stop();
}

#[test]
fn mkd_cwd_rmd_dele_lifecycle() {
    let (mut server, port, root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let reply = client.cmd("MKD sub");
    assert!(reply.starts_with("257 "), "{}", reply);
    assert!(reply.contains("\"/sub\""), "{}", reply);
    assert!(root.path().join("sub").is_dir());

    let reply = client.cmd("CWD sub");
    assert!(reply.starts_with("250 "), "{}", reply);
    let reply = client.cmd("PWD");
    assert!(reply.starts_with("257 \"/sub\""), "{}", reply);

    let reply = client.cmd("CWD nonexistent");
    assert!(reply.starts_with("550 "), "{}", reply);

    let reply = client.cmd("CDUP");
    assert!(reply.starts_with("250 "), "{}", reply);
    let reply = client.cmd("RMD sub");
    assert!(reply.starts_with("250 "), "{}", reply);
    assert!(!root.path().join("sub").exists());
    let reply = client.cmd("RMD sub");
    assert!(reply.starts_with("550 "), "{}", reply);

    std::fs::write(root.path().join("f"), b"x").unwrap();
    let reply = client.cmd("DELE f");
    assert!(reply.starts_with("250 "), "{}", reply);
    assert!(!root.path().join("f").exists());

    server.stop();
}

#[test]
fn unknown_and_malformed_commands_keep_the_session_alive() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let reply = client.cmd("BOGUS argument");
    assert!(reply.starts_with("500 "), "{}", reply);
    let reply = client.cmd("REST notanumber");
    assert!(reply.starts_with("501 "), "{}", reply);
    let reply = client.cmd("PORT 1,2,3");
    assert!(reply.starts_with("501 "), "{}", reply);
    let reply = client.cmd("TYPE X");
    assert!(reply.starts_with("504 "), "{}", reply);
    let reply = client.cmd("STRU R");
    assert!(reply.starts_with("504 "), "{}", reply);
    let reply = client.cmd("MODE B");
    assert!(reply.starts_with("504 "), "{}", reply);

    // Still here.
    let reply = client.cmd("NOOP");
    assert!(reply.starts_with("200 "), "{}", reply);

    server.stop();
}

#[test]
fn misc_commands_answer_positively() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let reply = client.cmd("SYST");
    assert_eq!(reply.trim_end(), "215 UNIX Type: L8");
    let reply = client.cmd("STRU F");
    assert!(reply.starts_with("200 "), "{}", reply);
    let reply = client.cmd("MODE S");
    assert!(reply.starts_with("200 "), "{}", reply);
    let reply = client.cmd("ALLO 1024");
    assert!(reply.starts_with("202 "), "{}", reply);
    let reply = client.cmd("ACCT x");
    assert!(reply.starts_with("202 "), "{}", reply);
    let reply = client.cmd("SITE CHMOD 777 f");
    assert!(reply.starts_with("200 "), "{}", reply);
    let reply = client.cmd("HELP");
    assert!(reply.starts_with("214 "), "{}", reply);
    let reply = client.cmd("STAT");
    assert!(reply.starts_with("211"), "{}", reply);
    let reply = client.cmd("ABOR");
    assert!(reply.starts_with("226 "), "{}", reply);

    server.stop();
}

#[test]
fn rein_logs_the_session_out() {
    let (mut server, port, _root) = start_server();
    let mut client = TestClient::connect(port);
    client.login("test", "test");

    let reply = client.cmd("REIN");
    assert!(reply.starts_with("220 "), "{}", reply);
    let reply = client.cmd("PWD");
    assert!(reply.starts_with("530 "), "{}", reply);
    client.login("test", "test");

    server.stop();
}

#[test]
fn command_callback_sees_commands_and_replies() {
    let root = tempfile::tempdir().unwrap();
    let observed: Arc<Mutex<Vec<(String, String, u32)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();

    let mut server = Server::bind("127.0.0.1", 0).unwrap();
    assert!(server.add_user("test", "test", root.path(), Permissions::ALL));
    server.set_command_callback(Arc::new(move |command, argument, code, _message| {
        sink.lock().unwrap().push((command.to_string(), argument.to_string(), code));
    }));
    server.start(1).unwrap();

    let mut client = TestClient::connect(server.port());
    client.login("test", "test");
    let reply = client.cmd("NOOP");
    assert!(reply.starts_with("200 "), "{}", reply);

    let seen = observed.lock().unwrap().clone();
    assert!(seen.contains(&("USER".to_string(), "test".to_string(), 331)), "{:?}", seen);
    assert!(seen.contains(&("PASS".to_string(), "test".to_string(), 230)), "{:?}", seen);
    assert!(seen.contains(&("NOOP".to_string(), String::new(), 200)), "{:?}", seen);

    server.stop();
}

#[test]
fn open_connection_count_tracks_sessions() {
    let (mut server, port, _root) = start_server();
    assert_eq!(server.open_connection_count(), 0);

    let client = TestClient::connect(port);
    assert_eq!(server.open_connection_count(), 1);
    let client2 = TestClient::connect(port);
    assert_eq!(server.open_connection_count(), 2);

    drop(client);
    drop(client2);
    // Session teardown is asynchronous; poll briefly.
    for _ in 0..100 {
        if server.open_connection_count() == 0 {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    assert_eq!(server.open_connection_count(), 0);

    server.stop();
}

#[test]
fn duplicate_users_and_restarts_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    let mut server = Server::bind("127.0.0.1", 0).unwrap();
    assert!(server.add_user("a", "a", root.path(), Permissions::ALL));
    assert!(!server.add_user("a", "b", root.path(), Permissions::ALL));
    assert!(matches!(server.start(0), Err(ftplet::ServerError::InvalidThreadCount)));
    server.start(1).unwrap();
    assert!(matches!(server.start(1), Err(ftplet::ServerError::AlreadyStarted)));
    // The database is sealed once the server runs.
    assert!(!server.add_user("late", "x", root.path(), Permissions::ALL));
    server.stop();
}
