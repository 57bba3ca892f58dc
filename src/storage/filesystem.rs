//! The per-account filesystem backend. All paths coming from the client are
//! FTP-virtual (rooted at `/`, `/`-separated); this module folds them
//! lexically and anchors them below the account's local root.

use crate::storage::{Error, ErrorKind, Fileinfo, Result};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncSeekExt;

/// Normalizes an FTP-virtual path: folds `.` and `..` components, collapses
/// repeated separators and clamps `..` at the root (the parent of `/` is
/// `/`). The result is always absolute and free of `.`/`..` segments.
pub fn fold_ftp_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut folded = PathBuf::from("/");
    for component in path.as_ref().components() {
        match component {
            Component::Normal(part) => folded.push(part),
            Component::ParentDir => {
                folded.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    folded
}

/// Filesystem access rooted in one account's local root. A client asking for
/// `/hello.txt` with the root set to `/srv/ftp` gets `/srv/ftp/hello.txt`;
/// no operation can reach above the root.
#[derive(Debug)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    /// Creates a backend with the given local root.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Filesystem { root: root.into() }
    }

    /// Maps an FTP-virtual path to the host path it denotes.
    ///
    /// Folding happens before the root join, so `..` sequences can never
    /// climb out; the post-condition check turns any remaining escape into
    /// permission-denied.
    fn full_path<P: AsRef<Path>>(&self, ftp_path: P) -> Result<PathBuf> {
        let folded = fold_ftp_path(ftp_path);
        let relative = folded.strip_prefix("/").unwrap_or(&folded);
        let local = self.root.join(relative);
        if !local.starts_with(&self.root) {
            return Err(Error::from(ErrorKind::PermissionDenied));
        }
        Ok(local)
    }

    /// Returns the metadata of the given path, following symlinks.
    pub async fn metadata<P: AsRef<Path>>(&self, ftp_path: P) -> Result<std::fs::Metadata> {
        let full_path = self.full_path(ftp_path)?;
        Ok(tokio::fs::metadata(full_path).await?)
    }

    /// Takes a snapshot of the given directory, sorted byte-wise ascending by
    /// name. Hidden entries are included; symlinks are reported with their
    /// target's metadata (falling back to the link itself when broken).
    pub async fn list<P: AsRef<Path>>(&self, ftp_path: P) -> Result<Vec<Fileinfo>> {
        let full_path = self.full_path(ftp_path)?;
        let mut rd = tokio::fs::read_dir(full_path).await?;
        let mut entries: Vec<Fileinfo> = Vec::new();
        while let Some(dir_entry) = rd.next_entry().await? {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            let metadata = match tokio::fs::metadata(dir_entry.path()).await {
                Ok(metadata) => metadata,
                Err(_) => tokio::fs::symlink_metadata(dir_entry.path()).await?,
            };
            entries.push(Fileinfo { name, metadata });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Opens a file for sequential reading, positioned at `start_pos`.
    pub async fn open_read<P: AsRef<Path>>(&self, ftp_path: P, start_pos: u64) -> Result<tokio::fs::File> {
        let full_path = self.full_path(ftp_path)?;
        let mut file = tokio::fs::File::open(full_path).await?;
        if start_pos > 0 {
            file.seek(std::io::SeekFrom::Start(start_pos)).await.map_err(|e| Error::new(ErrorKind::LocalError, e))?;
        }
        Ok(file)
    }

    /// Opens a file for writing, truncating any existing content.
    pub async fn create<P: AsRef<Path>>(&self, ftp_path: P) -> Result<tokio::fs::File> {
        let full_path = self.full_path(ftp_path)?;
        let file = tokio::fs::OpenOptions::new().write(true).create(true).truncate(true).open(full_path).await?;
        Ok(file)
    }

    /// Opens a file for appending, creating it when absent.
    pub async fn append<P: AsRef<Path>>(&self, ftp_path: P) -> Result<tokio::fs::File> {
        let full_path = self.full_path(ftp_path)?;
        let file = tokio::fs::OpenOptions::new().append(true).create(true).open(full_path).await?;
        Ok(file)
    }

    /// Deletes the file at the given path.
    pub async fn del<P: AsRef<Path>>(&self, ftp_path: P) -> Result<()> {
        let full_path = self.full_path(ftp_path)?;
        Ok(tokio::fs::remove_file(full_path).await?)
    }

    /// Creates the given directory.
    pub async fn mkd<P: AsRef<Path>>(&self, ftp_path: P) -> Result<()> {
        let full_path = self.full_path(ftp_path)?;
        Ok(tokio::fs::create_dir(full_path).await?)
    }

    /// Removes the given directory. Fails when it is not empty.
    pub async fn rmd<P: AsRef<Path>>(&self, ftp_path: P) -> Result<()> {
        let full_path = self.full_path(ftp_path)?;
        Ok(tokio::fs::remove_dir(full_path).await?)
    }

    /// Renames a file or directory.
    pub async fn rename<P: AsRef<Path>>(&self, from: P, to: P) -> Result<()> {
        let from = self.full_path(from)?;
        let to = self.full_path(to)?;
        Ok(tokio::fs::rename(from, to).await?)
    }
}
