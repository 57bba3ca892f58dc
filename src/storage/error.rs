use derive_more::Display;
use thiserror::Error;

/// The error returned by filesystem operations.
#[derive(Debug, Error)]
#[error("storage error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a new storage error wrapping an underlying cause.
    pub fn new<E>(kind: ErrorKind, error: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            source: Some(error.into()),
        }
    }

    /// Tells the session what FTP reply the failure maps to.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::PermanentFileNotAvailable,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::LocalError,
        };
        Error::new(kind, err)
    }
}

/// The failure categories a filesystem operation can produce. Each category
/// corresponds to one FTP reply code.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// 450 Requested file action not taken. File unavailable (e.g. file busy).
    #[display(fmt = "450 Transient file not available")]
    TransientFileNotAvailable,
    /// 550 Requested action not taken. File unavailable (e.g. file not found).
    #[display(fmt = "550 Permanent file not available")]
    PermanentFileNotAvailable,
    /// 550 Requested action not taken. Access denied, including attempts to
    /// escape the account's local root.
    #[display(fmt = "550 Permission denied")]
    PermissionDenied,
    /// 451 Requested action aborted. Local error in processing.
    #[display(fmt = "451 Local error")]
    LocalError,
}
