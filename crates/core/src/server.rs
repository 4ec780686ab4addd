use std::io;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;
use std::time::Duration;

use linelog_ringlog::SharedLog;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::client::{ClientTask, Connection, Registry, Status, StatusCell};
use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::shutdown::Shutdown;
use crate::ticker;

/// How long the acceptor waits for a connection before reaping finished
/// handler tasks.
const ACCEPT_DEADLINE: Duration = Duration::from_secs(1);
/// Pause after a transient accept failure.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Owns the listener, the log and the lifetime of every worker task.
pub struct Server {
    listener: TcpListener,
    log: SharedLog,
    config: ServerConfig,
    shutdown: Arc<Shutdown>,
}

impl Server {
    /// Create the listening socket for `config` without registering it with
    /// a runtime.
    ///
    /// Kept separate from [`Server::from_std`] so a caller can bind while
    /// still in the foreground and daemonize before any runtime exists; bind
    /// failures then reach the terminal.
    ///
    /// # Errors
    ///
    /// [`StartupError::Bind`] if the socket cannot be created, bound, or put
    /// into the listening state.
    pub fn bind_std(config: &ServerConfig) -> Result<StdTcpListener, StartupError> {
        let addr = config.listen_addr;
        let listen = |addr: SocketAddr| -> io::Result<StdTcpListener> {
            let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
            socket.set_reuse_address(true)?;
            socket.bind(&addr.into())?;
            socket.listen(config.backlog)?;
            Ok(socket.into())
        };
        listen(addr).map_err(|source| StartupError::Bind { addr, source })
    }

    /// Register an already bound listener with the current runtime.
    ///
    /// # Errors
    ///
    /// [`StartupError::Register`] if the listener cannot be switched to
    /// non-blocking mode or handed to tokio.
    pub fn from_std(
        listener: StdTcpListener,
        config: ServerConfig,
        shutdown: Arc<Shutdown>,
    ) -> Result<Self, StartupError> {
        listener
            .set_nonblocking(true)
            .map_err(StartupError::Register)?;
        let listener = TcpListener::from_std(listener).map_err(StartupError::Register)?;
        Ok(Self {
            listener,
            log: SharedLog::new(),
            config,
            shutdown,
        })
    }

    /// Bind and register in one step.
    ///
    /// # Errors
    ///
    /// See [`Server::bind_std`] and [`Server::from_std`].
    pub fn bind(config: ServerConfig, shutdown: Arc<Shutdown>) -> Result<Self, StartupError> {
        let listener = Self::bind_std(&config)?;
        Self::from_std(listener, config, shutdown)
    }

    /// Address the listener is bound to. Useful when binding to port 0.
    ///
    /// # Errors
    ///
    /// Propagates the OS error for a defunct socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve connections until shutdown is signalled, then drain
    /// every worker, clear the store and drop the listener.
    pub async fn serve(self) {
        let ticker = self.config.tick_period.map(|period| {
            tokio::spawn(ticker::run(
                self.log.clone(),
                period,
                Arc::clone(&self.shutdown),
            ))
        });
        let mut registry = Registry::default();

        if let Ok(addr) = self.listener.local_addr() {
            info!("listening on {addr}");
        }

        while !self.shutdown.is_signalled() {
            tokio::select! {
                _ = self.shutdown.wait() => break,
                accepted = timeout(ACCEPT_DEADLINE, self.listener.accept()) => match accepted {
                    // Deadline lapsed with no connection: reap finished handlers.
                    Err(_) => registry.reap().await,
                    Ok(Ok((stream, peer))) => self.spawn_handler(&mut registry, stream, peer),
                    Ok(Err(err)) => {
                        warn!("accept failed: {err}");
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    }
                },
            }
        }

        debug!("acceptor stopped, draining workers");
        if let Some(handle) = ticker {
            if let Err(err) = handle.await {
                warn!("ticker task panicked: {err}");
            }
        }
        registry.join_all().await;
        self.log.clear();
        info!("shutdown complete");
    }

    fn spawn_handler(&self, registry: &mut Registry, stream: TcpStream, peer: SocketAddr) {
        info!("accepted connection from {peer}");
        let status = Arc::new(StatusCell::new());
        let connection = Connection::new(
            stream,
            peer,
            self.log.clone(),
            Arc::clone(&self.shutdown),
            self.config.recv_buffer_size,
        );
        let handle = tokio::spawn({
            let status = Arc::clone(&status);
            async move {
                match connection.run().await {
                    Ok(()) => {
                        info!("closed connection from {peer}");
                        status.set(Status::Succeeded);
                    }
                    Err(err) => {
                        warn!("connection from {peer} failed: {err}");
                        status.set(Status::Failed);
                    }
                }
            }
        });
        registry.register(ClientTask {
            peer,
            status,
            handle,
        });
    }
}
