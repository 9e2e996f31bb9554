//! Raw-dump listener for bringing up new terminals.
//!
//! Speaks no protocol at all: every chunk a terminal sends is logged as hex
//! and as an escaped string, and nothing is ever written back. Useful to see
//! what a unit pushes before pointing it at the real gateway.

use anviz_core::constants::DEBUG_READ_BUFFER;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::GatewayError;

/// Listener that hex-dumps everything it receives.
pub struct RawDumpServer {
    listener: TcpListener,
    idle: Duration,
}

impl RawDumpServer {
    /// Bind `addr` as given. `idle` is the rolling read deadline per connection.
    pub async fn bind(addr: &str, idle: Duration) -> Result<Self, GatewayError> {
        let listener = TcpListener::bind(addr).await?;
        info!(
            addr = %listener.local_addr()?,
            idle_secs = idle.as_secs(),
            "Raw dump server listening"
        );
        Ok(Self { listener, idle })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, dumping each on its own task.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let idle = self.idle;
                    tokio::spawn(async move {
                        let total = dump_connection(stream, peer, idle).await;
                        info!(peer = %peer, bytes = total, "Dump connection closed");
                    });
                }
                Err(e) => error!(error = %e, "Failed to accept connection"),
            }
        }
    }
}

/// Log every chunk read from `stream` until EOF, a read error or `idle`
/// passes without data. Returns the number of bytes seen.
pub async fn dump_connection<S>(mut stream: S, peer: SocketAddr, idle: Duration) -> usize
where
    S: AsyncRead + Unpin,
{
    info!(peer = %peer, "Dump connection opened");

    let mut buffer = [0u8; DEBUG_READ_BUFFER];
    let mut total = 0;
    loop {
        let n = match tokio::time::timeout(idle, stream.read(&mut buffer)).await {
            Err(_) => {
                warn!(peer = %peer, idle_secs = idle.as_secs(), "No data, closing");
                break;
            }
            Ok(Err(e)) => {
                warn!(peer = %peer, error = %e, "Read failed");
                break;
            }
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => n,
        };

        let chunk = &buffer[..n];
        total += n;
        info!(
            peer = %peer,
            bytes = n,
            hex = %hex::encode_upper(chunk),
            text = %chunk.escape_ascii(),
            "Received"
        );
    }
    total
}
