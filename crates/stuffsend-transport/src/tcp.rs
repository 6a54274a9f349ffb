use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use tracing::{debug, info};

use crate::endpoint::TransportConfig;
use crate::error::{Result, TransportError};
use crate::stream::TransferStream;

/// Open a stream connection to the configured endpoint (blocking).
///
/// Without a connect timeout this defers to `TcpStream::connect`, which tries
/// every resolved address in turn. With one, each address gets the full
/// timeout and the last failure is reported.
pub fn connect(config: &TransportConfig) -> Result<TransferStream> {
    let endpoint = &config.endpoint;
    let stream = match config.connect_timeout {
        None => TcpStream::connect((endpoint.host.as_str(), endpoint.port)).map_err(|e| {
            TransportError::Connect {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })?,
        Some(timeout) => {
            let addrs: Vec<SocketAddr> = (endpoint.host.as_str(), endpoint.port)
                .to_socket_addrs()
                .map_err(|e| TransportError::Resolve {
                    endpoint: endpoint.to_string(),
                    source: e,
                })?
                .collect();

            let mut last_err = None;
            let mut connected = None;
            for addr in addrs {
                match TcpStream::connect_timeout(&addr, timeout) {
                    Ok(stream) => {
                        connected = Some(stream);
                        break;
                    }
                    Err(err) => {
                        debug!(%addr, error = %err, "connect attempt failed");
                        last_err = Some(err);
                    }
                }
            }

            match connected {
                Some(stream) => stream,
                None => {
                    return Err(TransportError::Connect {
                        endpoint: endpoint.to_string(),
                        source: last_err.unwrap_or_else(|| {
                            std::io::Error::new(
                                std::io::ErrorKind::AddrNotAvailable,
                                "endpoint resolved to no addresses",
                            )
                        }),
                    })
                }
            }
        }
    };

    let stream = TransferStream::from_tcp(stream);
    stream.set_write_timeout(config.write_timeout)?;
    stream.set_read_timeout(config.read_timeout)?;
    debug!(%endpoint, "connected to receiver");
    Ok(stream)
}

/// Listening side of the transfer protocol.
///
/// Accepts one connection per incoming file.
pub struct TcpTransferListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpTransferListener {
    /// Bind and listen on `addr` (e.g. `127.0.0.1:5000`, or port 0 for an
    /// ephemeral port).
    pub fn bind(addr: impl ToSocketAddrs + std::fmt::Debug) -> Result<Self> {
        let display = format!("{addr:?}");
        let listener = TcpListener::bind(&addr).map_err(|e| TransportError::Bind {
            addr: display.clone(),
            source: e,
        })?;
        let local_addr = listener.local_addr().map_err(|e| TransportError::Bind {
            addr: display,
            source: e,
        })?;

        info!(%local_addr, "listening for transfers");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<TransferStream> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        Ok(TransferStream::from_tcp(stream))
    }

    /// The bound address, with the OS-assigned port resolved.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
