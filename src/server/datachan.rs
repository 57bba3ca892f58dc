//! Contains code pertaining to the FTP *data* channel: obtaining the
//! per-transfer socket, streaming bytes between it and the filesystem, and
//! reporting the terminal result back to the control loop.

use super::chancomms::{ControlChanMsg, DataChanCmd};
use super::controlchan::{Reply, ReplyCode};
use super::session::{Session, SharedSession};
use crate::storage::{Error, ErrorKind};
use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

const CHUNK_SIZE: usize = 64 * 1024;

// How long we wait for the peer to show up on the data connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(300);

// Where the per-transfer socket comes from: our PASV acceptor or the peer's
// PORT endpoint. Either way it is consumed by exactly one transfer.
#[derive(Debug)]
enum SocketSource {
    Passive(TcpListener),
    Active(SocketAddrV4),
}

/// Spawns the data-transfer task for `cmd`, consuming whichever data channel
/// the session has prepared. Returns the error reply when neither PASV nor
/// PORT came first. The caller still owns the session lock.
pub fn spawn_transfer(
    session: &mut Session,
    session_arc: SharedSession,
    cmd: DataChanCmd,
    tx: mpsc::Sender<ControlChanMsg>,
    logger: slog::Logger,
) -> Result<(), Reply> {
    let source = if let Some(listener) = session.data_listener.take() {
        SocketSource::Passive(listener)
    } else if let Some(endpoint) = session.active_endpoint.take() {
        SocketSource::Active(endpoint)
    } else {
        return Err(Reply::new(ReplyCode::CantOpenDataConnection, "Use PORT or PASV first"));
    };

    let (abort_tx, abort_rx) = mpsc::channel(1);
    session.data_abort_tx = Some(abort_tx);
    session.data_busy = true;

    tokio::spawn(run(logger, session_arc, source, cmd, tx, abort_rx));
    Ok(())
}

async fn run(
    logger: slog::Logger,
    session_arc: SharedSession,
    source: SocketSource,
    cmd: DataChanCmd,
    tx: mpsc::Sender<ControlChanMsg>,
    mut abort_rx: mpsc::Receiver<()>,
) {
    slog::info!(logger, "Data channel command received: {:?}", cmd);
    let outcome = tokio::select! {
        result = execute(&logger, source, cmd) => Some(match result {
            Ok(msg) => msg,
            Err(msg) => msg,
        }),
        _ = abort_rx.recv() => {
            // The socket lives inside the cancelled future, so it is closed
            // by the time we get here. ABOR itself replies on the command
            // channel; nothing to report.
            slog::info!(logger, "Data transfer aborted");
            None
        }
    };

    if let Some(msg) = outcome {
        if let Err(err) = tx.send(msg).await {
            slog::warn!(logger, "Could not notify control channel of transfer result: {}", err);
        }
    }

    let mut session = session_arc.lock().await;
    session.data_busy = false;
    session.data_abort_tx = None;
}

// Runs the whole transfer. The data socket is owned here, so it is closed
// before the terminal message travels back to the control loop.
async fn execute(logger: &slog::Logger, source: SocketSource, cmd: DataChanCmd) -> Result<ControlChanMsg, ControlChanMsg> {
    let mut socket = connect(logger, source).await?;
    match cmd {
        DataChanCmd::Retr { file, path } => {
            let bytes = send_file(&mut socket, file).await?;
            Ok(ControlChanMsg::SentData { path, bytes })
        }
        DataChanCmd::Stor { file, path } => {
            let bytes = receive_file(&mut socket, file).await?;
            Ok(ControlChanMsg::WrittenData { path, bytes })
        }
        DataChanCmd::Appe { file, path } => {
            let bytes = receive_file(&mut socket, file).await?;
            Ok(ControlChanMsg::WrittenData { path, bytes })
        }
        DataChanCmd::Stou { file, filename } => {
            let bytes = receive_file(&mut socket, file).await?;
            Ok(ControlChanMsg::StoredUnique { filename, bytes })
        }
        DataChanCmd::List { data } => {
            send_bytes(&mut socket, &data).await?;
            Ok(ControlChanMsg::DirectorySuccessfullyListed)
        }
        DataChanCmd::Nlst { data } => {
            send_bytes(&mut socket, &data).await?;
            Ok(ControlChanMsg::DirectorySuccessfullyListed)
        }
    }
}

async fn connect(logger: &slog::Logger, source: SocketSource) -> Result<TcpStream, ControlChanMsg> {
    let attempt = tokio::time::timeout(CONNECT_TIMEOUT, async {
        match source {
            // The acceptor takes exactly one connection and is dropped
            // afterwards; a new transfer needs a new PASV.
            SocketSource::Passive(listener) => listener.accept().await.map(|(socket, _)| socket),
            SocketSource::Active(endpoint) => TcpStream::connect(SocketAddr::V4(endpoint)).await,
        }
    })
    .await;
    match attempt {
        Ok(Ok(socket)) => Ok(socket),
        Ok(Err(err)) => {
            slog::warn!(logger, "Could not establish data connection: {}", err);
            Err(ControlChanMsg::CouldNotConnect)
        }
        Err(_) => {
            slog::warn!(logger, "Timed out waiting for the data connection");
            Err(ControlChanMsg::CouldNotConnect)
        }
    }
}

// File -> socket. Socket errors are the peer's problem (426); file errors are
// ours (451). Closing the socket tells the peer the file is complete.
async fn send_file(socket: &mut TcpStream, mut file: tokio::fs::File) -> Result<u64, ControlChanMsg> {
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = file
            .read(&mut buffer)
            .await
            .map_err(|err| ControlChanMsg::StorageError(Error::new(ErrorKind::LocalError, err)))?;
        if n == 0 {
            break;
        }
        socket.write_all(&buffer[..n]).await.map_err(|_| ControlChanMsg::ConnectionReset)?;
        total += n as u64;
    }
    let _ = socket.shutdown().await;
    Ok(total)
}

// Socket -> file, chunks written in wire order. The peer's half-close ends
// the upload.
async fn receive_file(socket: &mut TcpStream, mut file: tokio::fs::File) -> Result<u64, ControlChanMsg> {
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = socket.read(&mut buffer).await.map_err(|_| ControlChanMsg::ConnectionReset)?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])
            .await
            .map_err(|err| ControlChanMsg::StorageError(Error::new(ErrorKind::LocalError, err)))?;
        total += n as u64;
    }
    file.flush()
        .await
        .map_err(|err| ControlChanMsg::StorageError(Error::new(ErrorKind::LocalError, err)))?;
    Ok(total)
}

async fn send_bytes(socket: &mut TcpStream, data: &[u8]) -> Result<(), ControlChanMsg> {
    socket.write_all(data).await.map_err(|_| ControlChanMsg::ConnectionReset)?;
    let _ = socket.shutdown().await;
    Ok(())
}
