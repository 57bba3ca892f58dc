//! User accounts, permissions and the in-memory account database.

mod permissions;
mod user;

pub use permissions::Permissions;
pub use user::{FtpUser, UserDatabase};
