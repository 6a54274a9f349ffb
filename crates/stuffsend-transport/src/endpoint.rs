use std::fmt;
use std::time::Duration;

/// Default receiver host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default receiver port.
pub const DEFAULT_PORT: u16 = 5000;

/// A fixed receiver address. Nothing about it is negotiated on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bracket bare IPv6 literals so the output parses back as host:port.
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl From<std::net::SocketAddr> for Endpoint {
    fn from(addr: std::net::SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}

/// Connection settings for one outgoing transfer.
///
/// All timeouts default to `None`: connect and write calls block until they
/// complete or the OS reports a failure.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Receiver address.
    pub endpoint: Endpoint,
    /// Upper bound for establishing the TCP connection.
    pub connect_timeout: Option<Duration>,
    /// Write timeout applied to the connected stream.
    pub write_timeout: Option<Duration>,
    /// Read timeout applied to the connected stream.
    pub read_timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }
}
