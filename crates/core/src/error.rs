use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Fatal error preventing the server from coming up.
///
/// These abort the process with a non-zero exit before any client is served;
/// nothing after startup maps to this type.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to register listener with the runtime")]
    Register(#[source] io::Error),
    #[error("failed to install signal handlers")]
    Signal(#[source] io::Error),
}

/// Terminal outcome of a single client connection.
///
/// Handler errors never propagate to the acceptor or to other handlers; the
/// handler task logs the error and records a failed status for the reaper.
#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("failed to receive from peer")]
    Recv(#[source] io::Error),
    #[error("failed to send to peer")]
    Send(#[source] io::Error),
    #[error("staging buffer exhausted memory")]
    OutOfMemory,
}
