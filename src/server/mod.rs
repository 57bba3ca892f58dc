//! The server side of things: the accept loop, per-connection sessions and
//! the control and data channels they drive.

pub(crate) mod chancomms;
pub(crate) mod controlchan;
pub(crate) mod datachan;
pub(crate) mod ftpserver;
pub(crate) mod session;
