//! Account records and the lookup table they live in.

use super::Permissions;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The reserved username that grants password-less access. `ftp` is accepted
/// as an alias when logging in.
pub(crate) const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_ALIAS: &str = "ftp";

/// A single FTP account: credentials, the host directory that backs the
/// account's virtual `/`, and what the account is allowed to do.
///
/// Accounts are created through [`Server::add_user`](crate::Server::add_user)
/// before the server starts and are immutable afterwards.
#[derive(Debug, Clone)]
pub struct FtpUser {
    /// The name used with the USER command.
    pub username: String,
    pub(crate) password: String,
    /// The host directory corresponding to this account's virtual root.
    pub local_root: PathBuf,
    /// What the account may do. See [`Permissions`].
    pub permissions: Permissions,
}

impl FtpUser {
    /// True for the reserved `anonymous`/`ftp` account, which accepts any
    /// password.
    pub fn is_anonymous(&self) -> bool {
        self.username == ANONYMOUS_USER
    }
}

/// The in-memory account database.
///
/// Populated by the embedder before the server starts; read-only and shared
/// across sessions afterwards, so lookups take no lock.
#[derive(Debug, Default)]
pub struct UserDatabase {
    users: HashMap<String, Arc<FtpUser>>,
}

impl UserDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        UserDatabase { users: HashMap::new() }
    }

    /// Adds an account. Returns false when the username is already taken.
    ///
    /// The usernames `anonymous` and `ftp` are reserved; use
    /// [`add_anonymous`](Self::add_anonymous) for those.
    pub fn add_user<P: AsRef<Path>>(&mut self, username: &str, password: &str, local_root: P, permissions: Permissions) -> bool {
        if username == ANONYMOUS_USER || username == ANONYMOUS_ALIAS {
            return false;
        }
        self.insert(FtpUser {
            username: username.to_string(),
            password: password.to_string(),
            local_root: local_root.as_ref().to_path_buf(),
            permissions,
        })
    }

    /// Adds the reserved anonymous account. Clients may log in as `anonymous`
    /// or `ftp` with any password. Returns false when already present.
    pub fn add_anonymous<P: AsRef<Path>>(&mut self, local_root: P, permissions: Permissions) -> bool {
        self.insert(FtpUser {
            username: ANONYMOUS_USER.to_string(),
            password: String::new(),
            local_root: local_root.as_ref().to_path_buf(),
            permissions,
        })
    }

    fn insert(&mut self, user: FtpUser) -> bool {
        if self.users.contains_key(&user.username) {
            return false;
        }
        self.users.insert(user.username.clone(), Arc::new(user));
        true
    }

    /// Looks an account up by login name, resolving the `ftp` alias.
    pub(crate) fn lookup(&self, username: &str) -> Option<&Arc<FtpUser>> {
        let key = if username == ANONYMOUS_ALIAS { ANONYMOUS_USER } else { username };
        self.users.get(key)
    }

    /// Verifies a username/password pair. The anonymous account matches any
    /// password.
    pub(crate) fn authenticate(&self, username: &str, password: &str) -> Option<Arc<FtpUser>> {
        let user = self.lookup(username)?;
        if user.is_anonymous() || user.password == password {
            Some(Arc::clone(user))
        } else {
            None
        }
    }

    /// Tells whether the anonymous account was registered.
    pub(crate) fn has_anonymous(&self) -> bool {
        self.users.contains_key(ANONYMOUS_USER)
    }
}
