use std::net::SocketAddr;
use std::sync::Arc;

use linelog_ringlog::SharedLog;
use memchr::memchr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::client::command::{self, Dispatch};
use crate::error::ClientError;
use crate::shutdown::Shutdown;

/// Per-client protocol handler.
///
/// Alternates between two phases: receive bytes until complete
/// newline-terminated records can be cut out of the staging buffer, and,
/// after each appended record, stream the resident log back from this
/// connection's cursor. The cursor starts at zero, advances with every byte
/// sent, and can be repositioned by an in-band seek command.
pub(crate) struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    log: SharedLog,
    shutdown: Arc<Shutdown>,
    /// Byte position within the resident window the next reply starts at.
    cursor: u64,
    /// Reassembly buffer for records that arrive fragmented.
    staging: Vec<u8>,
    buf_size: usize,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        log: SharedLog,
        shutdown: Arc<Shutdown>,
        buf_size: usize,
    ) -> Self {
        Self {
            stream,
            peer,
            log,
            shutdown,
            cursor: 0,
            staging: Vec::new(),
            buf_size,
        }
    }

    /// Drive the connection until the peer closes, an error occurs, or
    /// shutdown is signalled.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let mut buf = vec![0u8; self.buf_size];
        loop {
            let read = tokio::select! {
                _ = self.shutdown.wait() => return Ok(()),
                read = self.stream.read(&mut buf) => read,
            };
            let n = read.map_err(ClientError::Recv)?;
            if n == 0 {
                if !self.staging.is_empty() {
                    debug!(
                        peer = %self.peer,
                        "peer closed with {} staged bytes, discarding",
                        self.staging.len()
                    );
                }
                return Ok(());
            }

            self.stage(&buf[..n])?;
            // A single read may complete several records; each is handled in
            // arrival order, and trailing bytes stay staged for the next one.
            while let Some(record) = self.next_record() {
                self.dispatch(&record).await?;
            }
        }
    }

    fn stage(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.staging
            .try_reserve(bytes.len())
            .map_err(|_| ClientError::OutOfMemory)?;
        self.staging.extend_from_slice(bytes);
        Ok(())
    }

    /// Cut the first complete record out of the staging buffer, if any.
    fn next_record(&mut self) -> Option<Vec<u8>> {
        let newline = memchr(b'\n', &self.staging)?;
        Some(self.staging.drain(..=newline).collect())
    }

    async fn dispatch(&mut self, record: &[u8]) -> Result<(), ClientError> {
        match command::classify(record) {
            Dispatch::Data(bytes) => {
                self.log.append_record(bytes.to_vec());
                self.send_log().await
            }
            Dispatch::Seek(seek) => {
                match self.log.resolve_seek(seek.index, seek.offset) {
                    Ok(position) => {
                        trace!(peer = %self.peer, position, "cursor repositioned");
                        self.cursor = position;
                    }
                    Err(err) => debug!(peer = %self.peer, "ignoring seek command: {err}"),
                }
                Ok(())
            }
            Dispatch::Malformed => {
                debug!(peer = %self.peer, "ignoring malformed seek command");
                Ok(())
            }
        }
    }

    /// Stream the resident log from the cursor to its end.
    ///
    /// Each chunk is one lock-protected snapshot copied out of the store;
    /// the socket write happens with the lock released.
    async fn send_log(&mut self) -> Result<(), ClientError> {
        loop {
            let chunk = self.log.read_at(self.cursor, self.buf_size);
            if chunk.is_empty() {
                return Ok(());
            }
            self.stream
                .write_all(&chunk)
                .await
                .map_err(ClientError::Send)?;
            self.cursor += chunk.len() as u64;
        }
    }
}
