//! Directory-entry records and the UNIX `ls -l` style line format used by
//! LIST.

use chrono::{DateTime, Duration, Utc};
use std::fmt::{self, Formatter, Write};

/// One entry of a directory snapshot: its name and host metadata. The
/// `Display` impl renders the LIST long-listing line (without CRLF).
#[derive(Debug)]
pub struct Fileinfo {
    /// Bare file name, no directory components.
    pub name: String,
    /// Host metadata, taken from the symlink target where applicable.
    pub metadata: std::fs::Metadata,
}

// Mode bits shown in a listing line, in POSIX layout. On non-POSIX hosts a
// plausible set is synthesized instead.
struct ModeBits(u32);

const MODE_READ: u32 = 0o444;
const MODE_WRITE: u32 = 0o222;
const MODE_EXEC: u32 = 0o111;
const MODE_USER: u32 = 0o700;
const MODE_GROUP: u32 = 0o070;
const MODE_OTHERS: u32 = 0o007;

impl fmt::Display for ModeBits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char(if self.0 & MODE_USER & MODE_READ > 0 { 'r' } else { '-' })?;
        f.write_char(if self.0 & MODE_USER & MODE_WRITE > 0 { 'w' } else { '-' })?;
        f.write_char(if self.0 & MODE_USER & MODE_EXEC > 0 { 'x' } else { '-' })?;
        f.write_char(if self.0 & MODE_GROUP & MODE_READ > 0 { 'r' } else { '-' })?;
        f.write_char(if self.0 & MODE_GROUP & MODE_WRITE > 0 { 'w' } else { '-' })?;
        f.write_char(if self.0 & MODE_GROUP & MODE_EXEC > 0 { 'x' } else { '-' })?;
        f.write_char(if self.0 & MODE_OTHERS & MODE_READ > 0 { 'r' } else { '-' })?;
        f.write_char(if self.0 & MODE_OTHERS & MODE_WRITE > 0 { 'w' } else { '-' })?;
        f.write_char(if self.0 & MODE_OTHERS & MODE_EXEC > 0 { 'x' } else { '-' })?;
        Ok(())
    }
}

#[cfg(unix)]
fn mode_bits(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(metadata: &std::fs::Metadata) -> u32 {
    let mut mode = 0o444;
    if !metadata.permissions().readonly() {
        mode |= 0o222;
    }
    if metadata.is_dir() {
        mode |= 0o111;
    }
    mode
}

#[cfg(unix)]
fn owner_ids(metadata: &std::fs::Metadata) -> (u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (metadata.uid(), metadata.gid())
}

#[cfg(not(unix))]
fn owner_ids(_metadata: &std::fs::Metadata) -> (u32, u32) {
    (0, 0)
}

#[cfg(unix)]
fn link_count(metadata: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &std::fs::Metadata) -> u64 {
    1
}

// Listings show HH:MM for recent entries and the year for older (or
// far-future) ones, like ls does.
fn format_mtime(metadata: &std::fs::Metadata) -> String {
    let modified: Option<DateTime<Utc>> = metadata.modified().ok().map(DateTime::from);
    match modified {
        Some(when) => {
            let age = Utc::now().signed_duration_since(when);
            if age > Duration::days(180) || age < Duration::days(-1) {
                when.format("%b %d  %Y").to_string()
            } else {
                when.format("%b %d %H:%M").to_string()
            }
        }
        None => "--- -- --:--".to_string(),
    }
}

impl fmt::Display for Fileinfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (uid, gid) = owner_ids(&self.metadata);
        write!(
            f,
            "{filetype}{mode} {links:>3} {owner:>8} {group:>8} {size:>12} {modified} {name}",
            filetype = if self.metadata.is_dir() { "d" } else { "-" },
            mode = ModeBits(mode_bits(&self.metadata)),
            links = link_count(&self.metadata),
            owner = uid,
            group = gid,
            size = self.metadata.len(),
            modified = format_mtime(&self.metadata),
            name = self.name,
        )
    }
}
