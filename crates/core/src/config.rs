use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// TCP port the service listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 9000;

/// Runtime configuration of the service.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub listen_addr: SocketAddr,
    /// Listen backlog handed to the OS.
    pub backlog: i32,
    /// Size of the per-connection receive buffer, which is also the chunk
    /// size used when streaming the log back.
    pub recv_buffer_size: usize,
    /// Period of the timestamp ticker. `None` disables it.
    pub tick_period: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: (Ipv4Addr::UNSPECIFIED, DEFAULT_PORT).into(),
            backlog: 2,
            recv_buffer_size: 1024,
            tick_period: Some(Duration::from_secs(10)),
        }
    }
}
